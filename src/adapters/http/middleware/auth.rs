//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that validates Bearer tokens and injects the caller into extensions
//! - `RequireAuth` - Extractor that requires an authenticated caller
//! - `require_role` - Per-route role check
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth reads it, require_role checks it
//! ```
//!
//! # Example
//!
//! ```ignore
//! async fn list_plans(RequireAuth(user): RequireAuth) -> Result<Json<..>, ApiError> {
//!     require_role(&user, Role::STAFF)?;
//!     ...
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser, Role};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Authentication middleware that validates Bearer tokens.
///
/// A valid token puts `AuthenticatedUser` into the request extensions.
/// A request without a token continues unauthenticated, so public routes
/// work and protected handlers reject it through `RequireAuth`. An invalid
/// or expired token is rejected here with 401.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            let (status, message) = match &e {
                AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                AuthError::ServiceUnavailable(msg) => {
                    tracing::error!("Auth service unavailable: {}", msg);
                    (StatusCode::SERVICE_UNAVAILABLE, "Authentication service unavailable")
                }
                AuthError::InsufficientPermissions => {
                    (StatusCode::FORBIDDEN, "Insufficient permissions")
                }
            };

            (status, Json(ErrorResponse::new("AUTH_ERROR", message))).into_response()
        }
    }
}

/// Extractor that requires authentication.
///
/// Rejects with 401 when the middleware did not inject a caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Fails with `Forbidden` unless `user` holds one of `roles`.
pub fn require_role(user: &AuthenticatedUser, roles: &[Role]) -> Result<(), AuthRejection> {
    if user.has_any_role(roles) {
        Ok(())
    } else {
        tracing::debug!(user_id = %user.id, role = %user.role, "role not allowed for route");
        Err(AuthRejection::Forbidden)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
    /// Authenticated, but the role may not use this route.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthRejection::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", "Authentication required")
            }
            AuthRejection::Forbidden => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", "Insufficient permissions")
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
