//! RemovePlanHandler - Command handler for retiring a plan.
//!
//! - Members currently on the plan: refused (Conflict).
//! - Only historical periods reference it: deactivated.
//! - Nothing references it: deleted.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{ErrorCode, PlanId};
use crate::domain::membership::MembershipError;
use crate::ports::{Clock, PlanRepository};

/// Command to remove a plan.
#[derive(Debug, Clone)]
pub struct RemovePlanCommand {
    pub plan_id: PlanId,
}

/// What happened to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemovePlanResult {
    pub deleted: bool,
    pub deactivated: bool,
}

/// Handler for plan removal.
pub struct RemovePlanHandler {
    repo: Arc<dyn PlanRepository>,
    clock: Arc<dyn Clock>,
}

impl RemovePlanHandler {
    pub fn new(repo: Arc<dyn PlanRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn handle(
        &self,
        cmd: RemovePlanCommand,
    ) -> Result<RemovePlanResult, MembershipError> {
        let mut plan = self
            .repo
            .find_by_id(&cmd.plan_id)
            .await?
            .ok_or(MembershipError::PlanNotFound(cmd.plan_id))?;

        let members = self.repo.count_members_on_plan(&plan.id).await?;
        if members > 0 {
            return Err(MembershipError::plan_in_use(plan.id, members));
        }

        if self.repo.count_periods_on_plan(&plan.id).await? == 0 {
            match self.repo.delete(&plan.id).await {
                Ok(()) => {
                    tracing::info!(plan_id = %plan.id, "plan deleted");
                    return Ok(RemovePlanResult {
                        deleted: true,
                        deactivated: false,
                    });
                }
                // Referenced since the count; fall through to the checks below.
                Err(e) if e.code == ErrorCode::PlanInUse => {
                    let members = self.repo.count_members_on_plan(&plan.id).await?;
                    if members > 0 {
                        return Err(MembershipError::plan_in_use(plan.id, members));
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        plan.deactivate(self.clock.now());
        self.repo.update(&plan).await?;
        tracing::info!(plan_id = %plan.id, "plan deactivated");

        Ok(RemovePlanResult {
            deleted: false,
            deactivated: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::{UpdateMemberCommand, UpdateMemberHandler};
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::membership::ErrorKind;

    fn handler(fx: &Fixture) -> RemovePlanHandler {
        RemovePlanHandler::new(Arc::new(fx.store.clone()), fx.clock())
    }

    #[tokio::test]
    async fn unreferenced_plan_is_deleted() {
        let fx = Fixture::new();
        let plan = fx.plan("Trial", "50", 7).await;

        let result = handler(&fx)
            .handle(RemovePlanCommand { plan_id: plan.id })
            .await
            .unwrap();

        assert!(result.deleted);
        assert!(!result.deactivated);
        assert!(fx.store.find_by_id(&plan.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn plan_with_members_is_conflict() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        fx.member(&plan, "a@gym.test", "0").await;
        fx.member(&plan, "b@gym.test", "0").await;

        let err = handler(&fx)
            .handle(RemovePlanCommand { plan_id: plan.id })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.message(), "Plan in use by 2 members; reassign first");
    }

    #[tokio::test]
    async fn plan_with_only_history_is_deactivated() {
        let fx = Fixture::new();
        let old = fx.plan("Old", "500", 30).await;
        let new = fx.plan("New", "800", 30).await;
        let id = fx.member(&old, "a@gym.test", "500").await;
        UpdateMemberHandler::new(Arc::new(fx.store.clone()), fx.notifier(), fx.clock())
            .handle(UpdateMemberCommand {
                member_id: id,
                plan_id: Some(new.id),
                ..Default::default()
            })
            .await
            .unwrap();

        let result = handler(&fx)
            .handle(RemovePlanCommand { plan_id: old.id })
            .await
            .unwrap();

        assert_eq!(
            result,
            RemovePlanResult {
                deleted: false,
                deactivated: true
            }
        );
        let stored = fx.store.find_by_id(&old.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
    }

    #[tokio::test]
    async fn unknown_plan_is_not_found() {
        let fx = Fixture::new();

        let err = handler(&fx)
            .handle(RemovePlanCommand {
                plan_id: PlanId::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
