//! HTTP handlers for plan endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{require_role, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    CreatePlanCommand, GetPlanQuery, ListPlansQuery, RemovePlanCommand, UpdatePlanCommand,
};
use crate::domain::foundation::Role;

use super::dto::{
    CreatePlanRequest, ListPlansParams, PlanResponse, RemovePlanResponse, UpdatePlanRequest,
};

/// GET /api/plans
pub async fn list_plans(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListPlansParams>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let plans = state
        .list_plans_handler()
        .handle(ListPlansQuery {
            include_inactive: params.include_inactive,
        })
        .await?;

    Ok(Json(plans.into_iter().map(PlanResponse::from).collect::<Vec<_>>()))
}

/// GET /api/plans/:id
pub async fn get_plan(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let plan = state
        .get_plan_handler()
        .handle(GetPlanQuery {
            plan_id: parse_id(&id, "id")?,
        })
        .await?;

    Ok(Json(PlanResponse::from(plan)))
}

/// POST /api/plans
pub async fn create_plan(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ADMIN)?;

    let plan = state
        .create_plan_handler()
        .handle(CreatePlanCommand {
            name: request.name,
            price: request.price,
            duration_days: request.duration_days,
            features: request.features,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PlanResponse::from(plan))))
}

/// PUT /api/plans/:id
pub async fn update_plan(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ADMIN)?;

    let plan = state
        .update_plan_handler()
        .handle(UpdatePlanCommand {
            plan_id: parse_id(&id, "id")?,
            changes: request.into(),
        })
        .await?;

    Ok(Json(PlanResponse::from(plan)))
}

/// DELETE /api/plans/:id
///
/// Hard-deletes an unreferenced plan, otherwise deactivates it.
pub async fn remove_plan(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ADMIN)?;

    let result = state
        .remove_plan_handler()
        .handle(RemovePlanCommand {
            plan_id: parse_id(&id, "id")?,
        })
        .await?;

    Ok(Json(RemovePlanResponse::from(result)))
}
