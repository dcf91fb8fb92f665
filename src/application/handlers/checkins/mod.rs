//! Front-desk check-in handlers.

mod check_in;
mod check_out;
mod checkin_history;

pub use check_in::{CheckInCommand, CheckInHandler};
pub use check_out::{CheckOutCommand, CheckOutHandler};
pub use checkin_history::{CheckinHistoryHandler, CheckinHistoryQuery};
