//! Axum router for plan endpoints.

use axum::routing::get;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{create_plan, get_plan, list_plans, remove_plan, update_plan};

/// Plan catalog routes, mounted at `/api/plans`.
///
/// - `GET /` - List plans (`?includeInactive=true` for all)
/// - `POST /` - Create plan (admin)
/// - `GET /:id` - Get plan
/// - `PUT /:id` - Edit plan (admin)
/// - `DELETE /:id` - Delete or deactivate plan (admin)
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:id", get(get_plan).put(update_plan).delete(remove_plan))
}
