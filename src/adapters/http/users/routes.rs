//! Axum routers for staff accounts and login.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{create_user, list_users, login};

/// Staff account routes, mounted at `/api/users`.
///
/// - `GET /` - List accounts, paginated (admin)
/// - `POST /` - Create account (admin)
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", get(list_users).post(create_user))
}

/// Login, mounted at `/api/auth`.
///
/// - `POST /login` - Exchange email and password for a bearer token
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
