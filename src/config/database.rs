//! PostgreSQL connection settings

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL; carries the password so it is never logged.
    pub url: SecretString,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Upper bound on waiting for a member's row lock before a write fails.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }

    /// Parses the URL and sets per-session parameters.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ValidationError> {
        let url = self.url.expose_secret();
        if url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__URL"));
        }
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        let options = PgConnectOptions::from_str(url)
            .map_err(|_| ValidationError::InvalidDatabaseUrl)?
            .application_name("gym-membership")
            .options([("lock_timeout", format!("{}ms", self.lock_timeout_ms))]);
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.connect_options()?;
        if self.max_connections == 0 {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: SecretString::new(String::new()),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            lock_timeout_ms: default_lock_timeout_ms(),
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_lock_timeout_ms() -> u64 {
    5_000
}

fn default_run_migrations() -> bool {
    true
}
