//! Password hashing and access token issuance.
//!
//! Login verifies a password against the stored hash, then asks the issuer
//! for a token that the `SessionValidator` side will later accept.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::user::StaffUser;

/// One-way password hashing.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hashes `password` with a fresh salt.
    async fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// True when `password` matches `hash`. A malformed hash never matches.
    async fn verify(&self, password: &str, hash: &str) -> bool;
}

/// A signed access token handed back by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl AccessToken {
    pub fn bearer(token: String, expires_in: u64) -> Self {
        Self {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Signs access tokens for a signed-in user.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &StaffUser) -> Result<AccessToken, DomainError>;
}
