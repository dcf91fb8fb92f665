//! Axum router for check-in endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{check_in, check_out, checkin_history};

/// Check-in routes, mounted at `/api/checkins`.
pub fn checkin_routes() -> Router<AppState> {
    Router::new()
        .route("/:member_id/checkin", post(check_in))
        .route("/:member_id/checkout", post(check_out))
        .route("/:member_id/history", get(checkin_history))
}
