//! Dashboard query handlers.
//!
//! Read-only handlers for aggregating and viewing dashboard data.

mod get_dashboard_stats;

pub use get_dashboard_stats::GetDashboardStatsHandler;
