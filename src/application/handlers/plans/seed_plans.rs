//! SeedPlansHandler - Adds the starter catalog to an empty or partial install.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::membership::{MembershipError, Plan};
use crate::ports::{Clock, PlanRepository};

/// Name, price in whole currency units, duration in days, features.
const STARTER_PLANS: &[(&str, i64, i32, &str)] = &[
    ("Basic", 1000, 30, "Gym access"),
    ("Premium", 2000, 60, "Gym + Classes"),
    ("Personal Training", 5000, 30, "Gym + PT"),
];

pub struct SeedPlansHandler {
    repo: Arc<dyn PlanRepository>,
    clock: Arc<dyn Clock>,
}

impl SeedPlansHandler {
    pub fn new(repo: Arc<dyn PlanRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Creates each starter plan whose name is not taken, active or not.
    /// Returns how many were created.
    pub async fn handle(&self) -> Result<usize, MembershipError> {
        let existing: HashSet<String> = self
            .repo
            .list(true)
            .await?
            .into_iter()
            .map(|plan| plan.name)
            .collect();

        let mut created = 0;
        for (name, price, days, features) in STARTER_PLANS {
            if existing.contains(*name) {
                continue;
            }
            let plan = Plan::new(
                *name,
                Decimal::from(*price),
                *days,
                Some(features.to_string()),
                self.clock.now(),
            )?;
            self.repo.save(&plan).await?;
            tracing::info!(plan_id = %plan.id, name = %plan.name, "seeded plan");
            created += 1;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{dec, Fixture};

    #[tokio::test]
    async fn fills_in_missing_plans_only() {
        let fx = Fixture::new();
        fx.plan("Premium", "2500", 60).await;
        let handler = SeedPlansHandler::new(Arc::new(fx.store.clone()), fx.clock());

        let first = handler.handle().await.unwrap();
        let again = handler.handle().await.unwrap();

        assert_eq!(first, 2);
        assert_eq!(again, 0);
        let plans = fx.store.list(true).await.unwrap();
        assert_eq!(plans.len(), 3);
        let premium = plans.iter().find(|p| p.name == "Premium").unwrap();
        assert_eq!(premium.price, dec("2500"));
        let basic = plans.iter().find(|p| p.name == "Basic").unwrap();
        assert_eq!(basic.features.as_deref(), Some("Gym access"));
        assert_eq!(basic.duration_days, 30);
    }
}
