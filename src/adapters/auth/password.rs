//! Argon2id password hashing.
//!
//! Hashing is deliberately slow, so it runs on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PasswordHasher;

/// Produces PHC strings (`$argon2id$v=19$...`) with default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Failed to hash password: {}", e))
        })
}

fn verify_blocking(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("hashing task failed: {}", e))
            })?
    }

    async fn verify(&self, password: &str, hash: &str) -> bool {
        let password = password.to_owned();
        let hash = hash.to_owned();
        match tokio::task::spawn_blocking(move || verify_blocking(&password, &hash)).await {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(error = %e, "password verification task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hasher = Argon2PasswordHasher::new();

        let hash = hasher.hash("front-desk-1").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("front-desk-1", &hash).await);
        assert!(!hasher.verify("front-desk-2", &hash).await);
    }

    #[tokio::test]
    async fn same_password_gets_a_fresh_salt() {
        let hasher = Argon2PasswordHasher::new();

        let first = hasher.hash("front-desk-1").await.unwrap();
        let second = hasher.hash("front-desk-1").await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn malformed_hash_never_matches() {
        assert!(!Argon2PasswordHasher::new().verify("anything", "not-a-phc-string").await);
    }
}
