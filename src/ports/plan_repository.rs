//! Plan catalog persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::membership::Plan;

/// Repository port for membership plans.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn save(&self, plan: &Plan) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `PlanNotFound` if the plan doesn't exist
    async fn update(&self, plan: &Plan) -> Result<(), DomainError>;

    /// Hard-deletes a plan. Callers check references first.
    async fn delete(&self, id: &PlanId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, DomainError>;

    /// Plans newest first; inactive ones only when asked for.
    async fn list(&self, include_inactive: bool) -> Result<Vec<Plan>, DomainError>;

    /// Members whose current plan is `id`.
    async fn count_members_on_plan(&self, id: &PlanId) -> Result<i64, DomainError>;

    /// Periods (any status) that reference `id`.
    async fn count_periods_on_plan(&self, id: &PlanId) -> Result<i64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PlanRepository) {}
    }
}
