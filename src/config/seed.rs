//! Startup seeding of the first admin account and the starter plan catalog.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::user::MIN_PASSWORD_LEN;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Admin created at startup when no account has this email yet
    pub admin_email: Option<String>,

    pub admin_password: Option<SecretString>,

    /// Add the Basic, Premium and Personal Training plans if missing
    #[serde(default)]
    pub default_plans: bool,
}

impl SeedConfig {
    /// Email and password of the admin to seed, if configured.
    pub fn admin(&self) -> Option<(&str, &SecretString)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password)),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match (&self.admin_email, &self.admin_password) {
            (None, None) => Ok(()),
            (Some(_), Some(password)) => {
                if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
                    return Err(ValidationError::AdminSeedPasswordTooShort(MIN_PASSWORD_LEN));
                }
                Ok(())
            }
            _ => Err(ValidationError::IncompleteAdminSeed),
        }
    }
}
