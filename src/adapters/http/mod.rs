//! HTTP adapter - REST API over axum.
//!
//! Each resource has its own module with DTOs, handlers and routes.
//! `router::app_router` assembles them under `/api` behind the auth
//! middleware.

pub mod checkins;
pub mod dashboard;
pub mod error;
pub mod members;
pub mod middleware;
pub mod plans;
pub mod router;
pub mod state;
pub mod users;

pub use error::{ApiError, ErrorResponse};
pub use router::app_router;
pub use state::AppState;
