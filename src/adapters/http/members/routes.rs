//! Axum routers for member and payment endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    create_member, get_member, get_membership_periods, get_plan_history, list_members,
    list_payments, record_payment, update_member,
};

/// Member routes, mounted at `/api/members`.
///
/// - `POST /` - Enroll member
/// - `GET /` - List members (`status`, `name`, `page`, `limit`)
/// - `GET /:id` - Member detail
/// - `PUT /:id` - Edit, renew or switch plan
/// - `GET /:id/plan-history` - Plan switches, newest first
/// - `GET /:id/membership-periods` - Period ledger with payments
pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_member).get(list_members))
        .route("/:id", get(get_member).put(update_member))
        .route("/:id/plan-history", get(get_plan_history))
        .route("/:id/membership-periods", get(get_membership_periods))
}

/// Payment routes, mounted at `/api/payments`.
///
/// - `POST /:member_id` - Record payment against the active period
/// - `GET /:member_id` - Payment history
pub fn payment_routes() -> Router<AppState> {
    Router::new().route("/:member_id", post(record_payment).get(list_payments))
}
