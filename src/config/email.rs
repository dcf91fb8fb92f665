//! Email configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
///
/// Without an API key, notifications are logged instead of sent.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: Option<SecretString>,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// True if email delivery is configured
    pub fn delivery_enabled(&self) -> bool {
        self.resend_api_key.is_some()
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = &self.resend_api_key {
            if !key.expose_secret().starts_with("re_") {
                return Err(ValidationError::InvalidResendKey);
            }
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

fn default_from_email() -> String {
    "frontdesk@gym.example.com".to_string()
}

fn default_from_name() -> String {
    "Gym Front Desk".to_string()
}
