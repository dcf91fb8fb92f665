//! HTTP handlers for check-in endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::middleware::{require_role, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::{CheckInCommand, CheckOutCommand, CheckinHistoryQuery};
use crate::domain::foundation::Role;

use super::dto::CheckinResponse;

/// POST /api/checkins/:member_id/checkin
pub async fn check_in(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(member_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let checkin = state
        .check_in_handler()
        .handle(CheckInCommand {
            member_id: parse_id(&member_id, "memberId")?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CheckinResponse::from(checkin))))
}

/// POST /api/checkins/:member_id/checkout
pub async fn check_out(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(member_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::STAFF)?;

    let checkin = state
        .check_out_handler()
        .handle(CheckOutCommand {
            member_id: parse_id(&member_id, "memberId")?,
        })
        .await?;

    Ok(Json(CheckinResponse::from(checkin)))
}

/// GET /api/checkins/:member_id/history
pub async fn checkin_history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(member_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&user, Role::ALL)?;

    let visits = state
        .checkin_history_handler()
        .handle(CheckinHistoryQuery {
            member_id: parse_id(&member_id, "memberId")?,
        })
        .await?;

    Ok(Json(visits.into_iter().map(CheckinResponse::from).collect::<Vec<_>>()))
}
