//! Email delivery through the Resend HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::EmailConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{Notification, Notifier};

use super::templates::render;

const RESEND_API_URL: &str = "https://api.resend.com";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Sends member notifications as email via Resend.
pub struct ResendNotifier {
    client: Client,
    api_key: SecretString,
    from: String,
    base_url: String,
}

impl ResendNotifier {
    /// Returns `None` when no API key is configured.
    pub fn from_config(config: &EmailConfig) -> Result<Option<Self>, DomainError> {
        match &config.resend_api_key {
            Some(key) => Ok(Some(Self::new(key.clone(), config.from_header())?)),
            None => Ok(None),
        }
    }

    pub fn new(api_key: SecretString, from: impl Into<String>) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            api_key,
            from: from.into(),
            base_url: RESEND_API_URL.to_string(),
        })
    }

    /// Points the notifier at another API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        let message = render(notification);
        let request = SendEmailRequest {
            from: &self.from,
            to: [notification.recipient()],
            subject: &message.subject,
            text: &message.text,
            html: &message.html,
        };

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "timed out".to_string()
                } else if e.is_connect() {
                    format!("connection failed: {}", e)
                } else {
                    e.to_string()
                };
                DomainError::new(ErrorCode::InternalError, format!("Email send {}", reason))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Email provider returned {}: {}", status, body),
            ));
        }

        tracing::debug!(
            kind = notification.kind(),
            member_id = %notification.member_id(),
            "email accepted by provider"
        );
        Ok(())
    }
}
