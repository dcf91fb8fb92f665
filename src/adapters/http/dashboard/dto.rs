//! HTTP DTOs for dashboard endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ports::DashboardStats;

/// Front-desk counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    pub active_members: u64,
    pub expired_members: u64,
    pub soon_to_expire_members: u64,
    /// Sum of every recorded payment.
    pub total_fees: Decimal,
    /// Members whose end date falls within the next seven days, today included.
    pub upcoming_expiries: u64,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            active_members: stats.active,
            expired_members: stats.expired,
            soon_to_expire_members: stats.soon_to_expire,
            total_fees: stats.total_fees,
            upcoming_expiries: stats.upcoming_expiries,
        }
    }
}
