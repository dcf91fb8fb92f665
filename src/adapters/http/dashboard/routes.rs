//! Axum routers for dashboard and maintenance endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{get_stats, run_status_sweep};

/// Dashboard routes, mounted at `/api/dashboard`.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

/// Maintenance routes, mounted at `/api/tasks`.
pub fn task_routes() -> Router<AppState> {
    Router::new().route("/update-member-status", post(run_status_sweep))
}
