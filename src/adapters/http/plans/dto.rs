//! HTTP DTOs for plan endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::handlers::RemovePlanResult;
use crate::domain::membership::{Plan, PlanChanges};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/plans`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    pub name: String,
    /// Accepts `fees` for older clients.
    #[serde(alias = "fees")]
    pub price: Decimal,
    pub duration_days: i32,
    #[serde(default)]
    pub features: Option<String>,
}

/// Body of `PUT /api/plans/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    #[serde(alias = "fees")]
    pub price: Option<Decimal>,
    pub duration_days: Option<i32>,
    pub features: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdatePlanRequest> for PlanChanges {
    fn from(req: UpdatePlanRequest) -> Self {
        PlanChanges {
            name: req.name,
            price: req.price,
            duration_days: req.duration_days,
            features: req.features,
            is_active: req.is_active,
        }
    }
}

/// Query string of `GET /api/plans`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPlansParams {
    #[serde(default)]
    pub include_inactive: bool,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub duration_days: i32,
    pub features: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name,
            price: plan.price,
            duration_days: plan.duration_days,
            features: plan.features,
            is_active: plan.is_active,
            created_at: *plan.created_at.as_datetime(),
            updated_at: *plan.updated_at.as_datetime(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovePlanResponse {
    pub deleted: bool,
    pub deactivated: bool,
}

impl From<RemovePlanResult> for RemovePlanResponse {
    fn from(result: RemovePlanResult) -> Self {
        Self {
            deleted: result.deleted,
            deactivated: result.deactivated,
        }
    }
}
