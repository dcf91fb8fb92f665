//! Authentication types for the domain layer.
//!
//! These types represent an authenticated staff user extracted from a bearer
//! token. They have no provider dependencies; any token issuer can populate
//! them via the `SessionValidator` port.

use super::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Caller role, as carried in the token's `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    GymManager,
    Member,
}

impl Role {
    /// Every role; used for routes open to any authenticated caller.
    pub const ALL: &'static [Role] = &[Role::Admin, Role::GymManager, Role::Member];

    /// Roles allowed to run day-to-day desk operations.
    pub const STAFF: &'static [Role] = &[Role::Admin, Role::GymManager];

    /// Admin only.
    pub const ADMIN: &'static [Role] = &[Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::GymManager => "gym_manager",
            Role::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "gym_manager" => Ok(Role::GymManager),
            "member" => Ok(Role::Member),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

/// Authenticated user extracted from a validated token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Token subject.
    pub id: UserId,

    /// Email claim, if the issuer sets one.
    pub email: String,

    pub role: Role,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    /// Returns true if the user holds one of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the user's role is not allowed here.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// The authentication backend could not be reached or is misconfigured.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the caller should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
