//! CreatePlanHandler - Command handler for adding a plan to the catalog.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::membership::{MembershipError, Plan};
use crate::ports::{Clock, PlanRepository};

/// Command to create a plan.
#[derive(Debug, Clone)]
pub struct CreatePlanCommand {
    pub name: String,
    pub price: Decimal,
    pub duration_days: i32,
    pub features: Option<String>,
}

/// Handler for creating plans.
pub struct CreatePlanHandler {
    repo: Arc<dyn PlanRepository>,
    clock: Arc<dyn Clock>,
}

impl CreatePlanHandler {
    pub fn new(repo: Arc<dyn PlanRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn handle(&self, cmd: CreatePlanCommand) -> Result<Plan, MembershipError> {
        let plan = Plan::new(
            cmd.name,
            cmd.price,
            cmd.duration_days,
            cmd.features,
            self.clock.now(),
        )?;
        self.repo.save(&plan).await?;

        tracing::info!(plan_id = %plan.id, name = %plan.name, price = %plan.price, "plan created");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{dec, Fixture};
    use crate::domain::membership::ErrorKind;

    fn command(price: &str, days: i32) -> CreatePlanCommand {
        CreatePlanCommand {
            name: "Quarterly".to_string(),
            price: dec(price),
            duration_days: days,
            features: Some("Pool access".to_string()),
        }
    }

    #[tokio::test]
    async fn creates_active_plan() {
        let fx = Fixture::new();
        let handler = CreatePlanHandler::new(Arc::new(fx.store.clone()), fx.clock());

        let plan = handler.handle(command("2500", 90)).await.unwrap();

        assert!(plan.is_active);
        assert_eq!(plan.features.as_deref(), Some("Pool access"));
        let stored = fx.store.find_by_id(&plan.id).await.unwrap();
        assert_eq!(stored, Some(plan));
    }

    #[tokio::test]
    async fn rejects_non_positive_price_or_duration() {
        let fx = Fixture::new();
        let handler = CreatePlanHandler::new(Arc::new(fx.store.clone()), fx.clock());

        let price = handler.handle(command("0", 90)).await.unwrap_err();
        let days = handler.handle(command("100", 0)).await.unwrap_err();

        assert_eq!(price.kind(), ErrorKind::BadRequest);
        assert_eq!(days.kind(), ErrorKind::BadRequest);
        assert!(fx.store.list(true).await.unwrap().is_empty());
    }
}
