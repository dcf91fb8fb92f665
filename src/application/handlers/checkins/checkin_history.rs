//! CheckinHistoryHandler - Query handler for a member's visits.

use std::sync::Arc;

use crate::domain::checkin::Checkin;
use crate::domain::foundation::MemberId;
use crate::domain::membership::MembershipError;
use crate::ports::{CheckinRepository, MembershipReader};

/// Query for a member's visits.
#[derive(Debug, Clone)]
pub struct CheckinHistoryQuery {
    pub member_id: MemberId,
}

/// Handler returning visits newest first.
pub struct CheckinHistoryHandler {
    reader: Arc<dyn MembershipReader>,
    checkins: Arc<dyn CheckinRepository>,
}

impl CheckinHistoryHandler {
    pub fn new(reader: Arc<dyn MembershipReader>, checkins: Arc<dyn CheckinRepository>) -> Self {
        Self { reader, checkins }
    }

    pub async fn handle(
        &self,
        query: CheckinHistoryQuery,
    ) -> Result<Vec<Checkin>, MembershipError> {
        if self.reader.get_member(&query.member_id).await?.is_none() {
            return Err(MembershipError::MemberNotFound(query.member_id));
        }
        Ok(self.checkins.list_for_member(&query.member_id).await?)
    }
}
