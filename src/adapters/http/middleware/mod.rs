//! HTTP middleware for axum.
//!
//! - `auth` - Bearer token middleware, the `RequireAuth` extractor and role checks

pub mod auth;

pub use auth::{auth_middleware, require_role, AuthRejection, AuthState, RequireAuth};
