//! UpdatePlanHandler - Command handler for editing a plan.
//!
//! Open periods keep the price they were opened with; an edit only affects
//! periods opened afterwards.

use std::sync::Arc;

use crate::domain::foundation::PlanId;
use crate::domain::membership::{MembershipError, Plan, PlanChanges};
use crate::ports::{Clock, PlanRepository};

/// Command to edit a plan.
#[derive(Debug, Clone)]
pub struct UpdatePlanCommand {
    pub plan_id: PlanId,
    pub changes: PlanChanges,
}

/// Handler for plan edits.
pub struct UpdatePlanHandler {
    repo: Arc<dyn PlanRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdatePlanHandler {
    pub fn new(repo: Arc<dyn PlanRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn handle(&self, cmd: UpdatePlanCommand) -> Result<Plan, MembershipError> {
        let mut plan = self
            .repo
            .find_by_id(&cmd.plan_id)
            .await?
            .ok_or(MembershipError::PlanNotFound(cmd.plan_id))?;

        plan.apply(cmd.changes, self.clock.now())?;
        self.repo.update(&plan).await?;

        tracing::info!(
            plan_id = %plan.id,
            price = %plan.price,
            active = plan.is_active,
            "plan updated"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{dec, Fixture};
    use crate::domain::membership::ErrorKind;
    use crate::ports::MembershipReader;

    #[tokio::test]
    async fn price_change_leaves_open_period_snapshot() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;
        let id = fx.member(&plan, "sam@gym.test", "0").await;

        let updated = UpdatePlanHandler::new(Arc::new(fx.store.clone()), fx.clock())
            .handle(UpdatePlanCommand {
                plan_id: plan.id,
                changes: PlanChanges {
                    price: Some(dec("1200")),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.price, dec("1200"));
        let periods = fx.store.list_periods(&id).await.unwrap();
        assert_eq!(periods[0].period.plan_price, dec("1000"));
        assert_eq!(periods[0].period.due_amount, dec("1000"));
    }

    #[tokio::test]
    async fn invalid_edit_changes_nothing() {
        let fx = Fixture::new();
        let plan = fx.plan("Monthly", "1000", 30).await;

        let err = UpdatePlanHandler::new(Arc::new(fx.store.clone()), fx.clock())
            .handle(UpdatePlanCommand {
                plan_id: plan.id,
                changes: PlanChanges {
                    name: Some("Renamed".into()),
                    duration_days: Some(-1),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
        let stored = fx.store.find_by_id(&plan.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Monthly");
    }

    #[tokio::test]
    async fn unknown_plan_is_not_found() {
        let fx = Fixture::new();

        let err = UpdatePlanHandler::new(Arc::new(fx.store.clone()), fx.clock())
            .handle(UpdatePlanCommand {
                plan_id: PlanId::new(),
                changes: PlanChanges::default(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
