//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum HS256 secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

/// Tokens issued at login live this long unless configured otherwise.
const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Authentication configuration (HS256 bearer tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to sign and verify tokens
    pub jwt_secret: SecretString,

    /// `iss` claim set on issued tokens and required on incoming ones;
    /// neither when absent
    pub issuer: Option<String>,

    /// Lifetime of tokens issued at login
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 bytes.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production && secret.len() < MIN_PRODUCTION_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.token_ttl_secs == 0 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new(String::new()),
            issuer: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}
