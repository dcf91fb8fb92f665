//! HTTP handlers for dashboard and maintenance endpoints.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::members::dto::StatusSweepResponse;
use crate::adapters::http::middleware::{require_role, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::domain::foundation::Role;

use super::dto::DashboardStatsResponse;

/// GET /api/dashboard/stats
pub async fn get_stats(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let stats = state.dashboard_stats_handler().handle().await?;

    Ok(Json(DashboardStatsResponse::from(stats)))
}

/// POST /api/tasks/update-member-status
///
/// Runs the status sweep on demand.
pub async fn run_status_sweep(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ADMIN)?;

    tracing::info!(triggered_by = %user.id, "manual status sweep requested");
    let report = state.status_sweep_handler().handle().await?;

    Ok(Json(StatusSweepResponse::from(report)))
}
