//! Plan catalog queries.

use std::sync::Arc;

use crate::domain::foundation::PlanId;
use crate::domain::membership::{MembershipError, Plan};
use crate::ports::PlanRepository;

/// Query for the catalog.
#[derive(Debug, Clone, Default)]
pub struct ListPlansQuery {
    pub include_inactive: bool,
}

/// Handler listing plans newest first.
pub struct ListPlansHandler {
    repo: Arc<dyn PlanRepository>,
}

impl ListPlansHandler {
    pub fn new(repo: Arc<dyn PlanRepository>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: ListPlansQuery) -> Result<Vec<Plan>, MembershipError> {
        Ok(self.repo.list(query.include_inactive).await?)
    }
}

/// Query for one plan.
#[derive(Debug, Clone)]
pub struct GetPlanQuery {
    pub plan_id: PlanId,
}

/// Handler returning one plan, active or not.
pub struct GetPlanHandler {
    repo: Arc<dyn PlanRepository>,
}

impl GetPlanHandler {
    pub fn new(repo: Arc<dyn PlanRepository>) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: GetPlanQuery) -> Result<Plan, MembershipError> {
        self.repo
            .find_by_id(&query.plan_id)
            .await?
            .ok_or(MembershipError::PlanNotFound(query.plan_id))
    }
}
