//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `GYM_MEMBERSHIP` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use gym_membership::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod email;
mod error;
mod scheduler;
mod seed;
mod server;

pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_BYTES};
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use scheduler::SchedulerConfig;
pub use seed::SeedConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Bearer token verification
    pub auth: AuthConfig,

    /// Email configuration (Resend)
    #[serde(default)]
    pub email: EmailConfig,

    /// Background status sweep
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// First admin account and starter plans
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GYM_MEMBERSHIP` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GYM_MEMBERSHIP__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GYM_MEMBERSHIP__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GYM_MEMBERSHIP")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.email.validate()?;
        self.scheduler.validate()?;
        self.seed.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("GYM_MEMBERSHIP__DATABASE__URL", "postgres://gym@localhost/gym");
        env::set_var("GYM_MEMBERSHIP__AUTH__JWT_SECRET", "local-development-secret");
    }

    fn clear_env() {
        for key in [
            "GYM_MEMBERSHIP__DATABASE__URL",
            "GYM_MEMBERSHIP__AUTH__JWT_SECRET",
            "GYM_MEMBERSHIP__SERVER__PORT",
            "GYM_MEMBERSHIP__SERVER__ENVIRONMENT",
            "GYM_MEMBERSHIP__SCHEDULER__STATUS_SWEEP_INTERVAL_SECS",
            "GYM_MEMBERSHIP__SEED__ADMIN_EMAIL",
            "GYM_MEMBERSHIP__SEED__ADMIN_PASSWORD",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url.expose_secret(), "postgres://gym@localhost/gym");
        assert!(config.database.run_migrations);
        assert!(!config.email.delivery_enabled());
        assert!(config.scheduler.status_sweep_enabled);
    }

    #[test]
    fn test_validate_minimal_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_database_url_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("GYM_MEMBERSHIP__AUTH__JWT_SECRET", "local-development-secret");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GYM_MEMBERSHIP__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(config.validate(), Err(ValidationError::JwtSecretTooShort));
    }

    #[test]
    fn test_custom_port_and_interval() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GYM_MEMBERSHIP__SERVER__PORT", "3000");
        env::set_var("GYM_MEMBERSHIP__SCHEDULER__STATUS_SWEEP_INTERVAL_SECS", "60");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.scheduler.status_sweep_interval_secs, 60);
    }

    #[test]
    fn test_admin_seed_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GYM_MEMBERSHIP__SEED__ADMIN_EMAIL", "admin@gym.test");
        env::set_var("GYM_MEMBERSHIP__SEED__ADMIN_PASSWORD", "change-me-now");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let (email, password) = config.seed.admin().unwrap();
        assert_eq!(email, "admin@gym.test");
        assert_eq!(password.expose_secret(), "change-me-now");
        assert!(config.validate().is_ok());
    }
}
