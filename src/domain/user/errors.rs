//! Errors raised by staff account operations.

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::membership::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    InvalidCredentials,

    /// Another account already uses this email.
    DuplicateEmail(String),

    ValidationFailed { field: String, message: String },

    Infrastructure(String),
}

impl UserError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        UserError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        UserError::Infrastructure(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::InvalidCredentials => ErrorKind::Unauthorized,
            UserError::DuplicateEmail(_) => ErrorKind::Conflict,
            UserError::ValidationFailed { .. } => ErrorKind::BadRequest,
            UserError::Infrastructure(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            UserError::InvalidCredentials => ErrorCode::Unauthorized,
            UserError::DuplicateEmail(_) => ErrorCode::DuplicateEntry,
            UserError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            UserError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            UserError::InvalidCredentials => "Invalid credentials".to_string(),
            UserError::DuplicateEmail(email) => {
                format!("A user with email '{}' already exists", email)
            }
            UserError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            UserError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for UserError {}

impl From<DomainError> for UserError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::DuplicateEntry => {
                UserError::DuplicateEmail(err.detail("value").unwrap_or_default().to_string())
            }
            ErrorCode::ValidationFailed => UserError::ValidationFailed {
                field: err.detail("field").unwrap_or("unknown").to_string(),
                message: err.message,
            },
            _ => UserError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for UserError {
    fn from(err: ValidationError) -> Self {
        UserError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
