//! Background jobs.

mod status_sweep;

pub use status_sweep::StatusSweepScheduler;
