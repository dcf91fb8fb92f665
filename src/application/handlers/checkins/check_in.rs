//! CheckInHandler - Command handler for opening a gym visit.

use std::sync::Arc;

use crate::domain::checkin::Checkin;
use crate::domain::foundation::{ErrorCode, MemberId};
use crate::domain::membership::MembershipError;
use crate::ports::{CheckinRepository, Clock, MembershipReader};

/// Command to check a member in.
#[derive(Debug, Clone)]
pub struct CheckInCommand {
    pub member_id: MemberId,
}

/// Handler for check-ins.
pub struct CheckInHandler {
    reader: Arc<dyn MembershipReader>,
    checkins: Arc<dyn CheckinRepository>,
    clock: Arc<dyn Clock>,
}

impl CheckInHandler {
    pub fn new(
        reader: Arc<dyn MembershipReader>,
        checkins: Arc<dyn CheckinRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reader,
            checkins,
            clock,
        }
    }

    pub async fn handle(&self, cmd: CheckInCommand) -> Result<Checkin, MembershipError> {
        if self.reader.get_member(&cmd.member_id).await?.is_none() {
            return Err(MembershipError::MemberNotFound(cmd.member_id));
        }
        if self.checkins.find_open(&cmd.member_id).await?.is_some() {
            return Err(MembershipError::AlreadyCheckedIn(cmd.member_id));
        }

        let checkin = Checkin::open(cmd.member_id, self.clock.now());
        match self.checkins.save(&checkin).await {
            Ok(()) => {}
            Err(e) if e.code == ErrorCode::DuplicateEntry => {
                return Err(MembershipError::AlreadyCheckedIn(cmd.member_id));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(member_id = %cmd.member_id, checkin_id = %checkin.id, "member checked in");
        Ok(checkin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::membership::ErrorKind;

    fn handler(fx: &Fixture) -> CheckInHandler {
        let store = Arc::new(fx.store.clone());
        CheckInHandler::new(store.clone(), store, fx.clock())
    }

    #[tokio::test]
    async fn opens_a_visit() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        let id = fx.member(&plan, "sam@gym.test", "0").await;

        let checkin = handler(&fx)
            .handle(CheckInCommand { member_id: id })
            .await
            .unwrap();

        assert!(checkin.is_open());
        assert_eq!(checkin.member_id, id);
    }

    #[tokio::test]
    async fn second_check_in_is_bad_request() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        let id = fx.member(&plan, "sam@gym.test", "0").await;
        handler(&fx)
            .handle(CheckInCommand { member_id: id })
            .await
            .unwrap();

        let err = handler(&fx)
            .handle(CheckInCommand { member_id: id })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "Member already checked in");
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(CheckInCommand {
                member_id: MemberId::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
