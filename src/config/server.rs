//! HTTP listener, request limits and logging.

use http::HeaderValue;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::error::ValidationError;

/// Longest request the front desk should ever wait on.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub environment: Environment,

    /// `EnvFilter` directives; `RUST_LOG` overrides them.
    pub log_filter: String,

    pub request_timeout_secs: u64,

    /// How long shutdown waits for an in-flight status sweep.
    pub shutdown_grace_secs: u64,

    /// Comma-separated browser origins of the front-desk UI. Unset allows any.
    pub cors_origins: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Production logs are JSON for the log shipper.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Parsed CORS origins. Empty means any origin.
    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>, ValidationError> {
        let Some(raw) = &self.cors_origins else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                    return Err(ValidationError::InvalidCorsOrigin(origin.to_string()));
                }
                HeaderValue::from_str(origin)
                    .map_err(|_| ValidationError::InvalidCorsOrigin(origin.to_string()))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout);
        }
        self.allowed_origins()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            environment: Environment::Development,
            log_filter: "info,gym_membership=debug,sqlx=warn".to_string(),
            request_timeout_secs: 30,
            shutdown_grace_secs: 10,
            cors_origins: None,
        }
    }
}
