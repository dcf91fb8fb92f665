//! Mock session validator for testing.
//!
//! # Example
//!
//! ```ignore
//! use gym_membership::adapters::auth::MockSessionValidator;
//! use gym_membership::domain::foundation::Role;
//!
//! let validator = MockSessionValidator::new()
//!     .with_role("admin-token", Role::Admin)
//!     .with_role("desk-token", Role::GymManager);
//!
//! let result = validator.validate("desk-token").await;
//! assert!(result.is_ok());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::ports::SessionValidator;

/// Mock session validator for testing.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    /// Map of valid tokens to their associated users
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Optional error to return for all validations (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    /// Creates a new empty mock validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.into(), user);
        self
    }

    /// Adds a valid token for a user holding `role`.
    ///
    /// The token doubles as the user id.
    pub fn with_role(self, token: impl Into<String>, role: Role) -> Self {
        let token = token.into();
        let user = match UserId::new(token.clone()) {
            Ok(id) => AuthenticatedUser::new(id, format!("{}@test.example.com", role), role),
            Err(_) => return self,
        };
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap_or_else(|e| e.into_inner()) = Some(error);
        self
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
