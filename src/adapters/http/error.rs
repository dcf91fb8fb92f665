//! HTTP error mapping.
//!
//! | Kind | Status |
//! |------|--------|
//! | Unauthorized | 401 |
//! | NotFound | 404 |
//! | Conflict | 409 |
//! | BadRequest | 400 |
//! | Internal | 500 |
//!
//! Authentication failures are 401, role failures 403.

use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::membership::{ErrorKind, MembershipError};
use crate::domain::user::UserError;

use super::middleware::AuthRejection;

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// Error returned by every API handler.
#[derive(Debug)]
pub enum ApiError {
    Membership(MembershipError),
    User(UserError),
    Auth(AuthRejection),
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        ApiError::User(err)
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        ApiError::Membership(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Membership(MembershipError::from(err))
    }
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        ApiError::Auth(rejection)
    }
}

/// Parses a path segment into a typed id.
pub(crate) fn parse_id<T: FromStr>(raw: &str, field: &str) -> Result<T, ApiError> {
    raw.parse::<T>().map_err(|_| {
        MembershipError::validation(field, format!("'{}' is not a valid id", raw)).into()
    })
}

pub(crate) fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (kind, code, message) = match self {
            ApiError::Auth(rejection) => return rejection.into_response(),
            ApiError::Membership(err) => (err.kind(), err.code(), err.message()),
            ApiError::User(err) => (err.kind(), err.code(), err.message()),
        };

        let status = status_for(kind);
        let message = if kind == ErrorKind::Internal {
            tracing::error!(error_code = %code, error = %message, "request failed");
            "Internal server error".to_string()
        } else {
            message
        };

        (status, Json(ErrorResponse::new(code.to_string(), message))).into_response()
    }
}
