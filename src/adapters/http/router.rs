//! Assembles the HTTP application.
//!
//! ```text
//! /health                  (no auth, no timeout)
//! /api/members             member_routes
//! /api/payments            payment_routes
//! /api/plans               plan_routes
//! /api/checkins            checkin_routes
//! /api/dashboard           dashboard_routes
//! /api/tasks               task_routes
//! /api/users               user_routes
//! /api/auth/login          auth_routes (no token needed)
//! ```

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;

use super::checkins::checkin_routes;
use super::dashboard::{dashboard_routes, task_routes};
use super::members::{member_routes, payment_routes};
use super::middleware::auth_middleware;
use super::plans::plan_routes;
use super::state::AppState;
use super::users::{auth_routes, user_routes};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Builds the full router with tracing, CORS and request timeouts.
pub fn app_router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .nest("/members", member_routes())
        .nest("/payments", payment_routes())
        .nest("/plans", plan_routes())
        .nest("/checkins", checkin_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/tasks", task_routes())
        .nest("/users", user_routes())
        .nest("/auth", auth_routes())
        .layer(from_fn_with_state(
            state.session_validator.clone(),
            auth_middleware,
        ));

    // Outermost first
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(config))
        .layer(TimeoutLayer::new(config.request_timeout()));

    Router::new()
        .nest("/api", api)
        .layer(middleware)
        .route("/health", get(health))
        .with_state(state)
}

/// Configured origins, or any origin when none are set. Origins were
/// checked by `ServerConfig::validate` at startup.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match config.allowed_origins() {
        Ok(origins) if !origins.is_empty() => layer.allow_origin(origins),
        Ok(_) => layer.allow_origin(Any),
        Err(e) => {
            tracing::warn!(error = %e, "falling back to any CORS origin");
            layer.allow_origin(Any)
        }
    }
}
