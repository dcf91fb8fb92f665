//! Session validation port for bearer token validation.
//!
//! Provider-agnostic: the production adapter verifies HS256 JWTs issued by
//! the gym's auth service, and a mock serves tests.
//!
//! # Security Requirements
//!
//! All implementations MUST validate:
//! - **Signature**: Token must be signed with the configured key
//! - **Expiry (exp)**: Token must not be expired
//! - **Issuer (iss)**: When an issuer is configured, it must match
//! - **Role**: The `role` claim must name a known role

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate an access token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
