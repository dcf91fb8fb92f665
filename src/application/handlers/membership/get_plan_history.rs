//! GetPlanHistoryHandler - Query handler for a member's plan switches.

use std::sync::Arc;

use crate::domain::foundation::MemberId;
use crate::domain::membership::MembershipError;
use crate::ports::{MembershipReader, PlanChangeView};

/// Query for a member's plan change records.
#[derive(Debug, Clone)]
pub struct GetPlanHistoryQuery {
    pub member_id: MemberId,
}

/// Handler returning plan changes newest first.
pub struct GetPlanHistoryHandler {
    reader: Arc<dyn MembershipReader>,
}

impl GetPlanHistoryHandler {
    pub fn new(reader: Arc<dyn MembershipReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetPlanHistoryQuery,
    ) -> Result<Vec<PlanChangeView>, MembershipError> {
        if self.reader.get_member(&query.member_id).await?.is_none() {
            return Err(MembershipError::MemberNotFound(query.member_id));
        }
        Ok(self.reader.list_plan_changes(&query.member_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::{UpdateMemberCommand, UpdateMemberHandler};
    use crate::application::handlers::test_support::Fixture;

    #[tokio::test]
    async fn lists_switches_newest_first_with_plan_names() {
        let fx = Fixture::new();
        let basic = fx.plan("Basic", "500", 30).await;
        let gold = fx.plan("Gold", "900", 30).await;
        let id = fx.member(&basic, "sam@gym.test", "500").await;

        let updater =
            UpdateMemberHandler::new(Arc::new(fx.store.clone()), fx.notifier(), fx.clock());
        updater
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(gold.id),
                ..Default::default()
            })
            .await
            .unwrap();

        let history = GetPlanHistoryHandler::new(Arc::new(fx.store.clone()))
            .handle(GetPlanHistoryQuery { member_id: id })
            .await
            .unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].from_plan_name.as_deref(), Some("Basic"));
        assert_eq!(history[0].to_plan_name, "Gold");
    }

    #[tokio::test]
    async fn member_without_switches_has_empty_history() {
        let fx = Fixture::new();
        let plan = fx.plan("Basic", "500", 30).await;
        let id = fx.member(&plan, "sam@gym.test", "0").await;

        let history = GetPlanHistoryHandler::new(Arc::new(fx.store.clone()))
            .handle(GetPlanHistoryQuery { member_id: id })
            .await
            .unwrap();

        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let fx = Fixture::new();

        let err = GetPlanHistoryHandler::new(Arc::new(fx.store.clone()))
            .handle(GetPlanHistoryQuery {
                member_id: MemberId::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MembershipError::MemberNotFound(_)));
    }
}
