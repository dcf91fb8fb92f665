//! CheckOutHandler - Command handler for closing a gym visit.

use std::sync::Arc;

use crate::domain::checkin::Checkin;
use crate::domain::foundation::MemberId;
use crate::domain::membership::MembershipError;
use crate::ports::{CheckinRepository, Clock};

/// Command to check a member out.
#[derive(Debug, Clone)]
pub struct CheckOutCommand {
    pub member_id: MemberId,
}

/// Handler for check-outs.
pub struct CheckOutHandler {
    checkins: Arc<dyn CheckinRepository>,
    clock: Arc<dyn Clock>,
}

impl CheckOutHandler {
    pub fn new(checkins: Arc<dyn CheckinRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { checkins, clock }
    }

    pub async fn handle(&self, cmd: CheckOutCommand) -> Result<Checkin, MembershipError> {
        let mut checkin = self
            .checkins
            .find_open(&cmd.member_id)
            .await?
            .ok_or(MembershipError::NoOpenCheckin(cmd.member_id))?;

        checkin.close(self.clock.now());
        self.checkins.update(&checkin).await?;

        tracing::info!(member_id = %cmd.member_id, checkin_id = %checkin.id, "member checked out");
        Ok(checkin)
    }
}
