//! GetMembershipPeriodsHandler - Query handler for a member's period ledger.

use std::sync::Arc;

use crate::domain::foundation::MemberId;
use crate::domain::membership::MembershipError;
use crate::ports::{MembershipReader, PeriodView};

/// Query for a member's periods.
#[derive(Debug, Clone)]
pub struct GetMembershipPeriodsQuery {
    pub member_id: MemberId,
}

/// Handler returning periods newest first, each with its plan and payments.
pub struct GetMembershipPeriodsHandler {
    reader: Arc<dyn MembershipReader>,
}

impl GetMembershipPeriodsHandler {
    pub fn new(reader: Arc<dyn MembershipReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetMembershipPeriodsQuery,
    ) -> Result<Vec<PeriodView>, MembershipError> {
        if self.reader.get_member(&query.member_id).await?.is_none() {
            return Err(MembershipError::MemberNotFound(query.member_id));
        }
        Ok(self.reader.list_periods(&query.member_id).await?)
    }
}
