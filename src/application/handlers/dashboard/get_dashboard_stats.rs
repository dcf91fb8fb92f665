//! GetDashboardStatsHandler - Query handler for the front-desk dashboard.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::membership::{MembershipError, SOON_TO_EXPIRE_WINDOW_DAYS};
use crate::ports::{Clock, DashboardStats, MembershipReader};

/// Handler for dashboard counters.
///
/// Upcoming expiries are members ending between today and a week from
/// today, inclusive.
pub struct GetDashboardStatsHandler {
    reader: Arc<dyn MembershipReader>,
    clock: Arc<dyn Clock>,
}

impl GetDashboardStatsHandler {
    pub fn new(reader: Arc<dyn MembershipReader>, clock: Arc<dyn Clock>) -> Self {
        Self { reader, clock }
    }

    pub async fn handle(&self) -> Result<DashboardStats, MembershipError> {
        let today = self.clock.today();
        let until = today + Duration::days(SOON_TO_EXPIRE_WINDOW_DAYS);
        Ok(self.reader.dashboard_stats(today, until).await?)
    }
}
