//! GetMemberHandler - Query handler for a single member with its plan.

use std::sync::Arc;

use crate::domain::foundation::MemberId;
use crate::domain::membership::MembershipError;
use crate::ports::{MemberView, MembershipReader};

/// Query to get one member.
#[derive(Debug, Clone)]
pub struct GetMemberQuery {
    pub member_id: MemberId,
}

/// Handler for retrieving a member.
pub struct GetMemberHandler {
    reader: Arc<dyn MembershipReader>,
}

impl GetMemberHandler {
    pub fn new(reader: Arc<dyn MembershipReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetMemberQuery) -> Result<MemberView, MembershipError> {
        self.reader
            .get_member(&query.member_id)
            .await?
            .ok_or(MembershipError::MemberNotFound(query.member_id))
    }
}
