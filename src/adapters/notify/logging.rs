//! Notifier that only logs.
//!
//! Used when no email provider is configured.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{Notification, Notifier};

use super::templates::render;

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        let message = render(notification);
        tracing::info!(
            kind = notification.kind(),
            member_id = %notification.member_id(),
            to = notification.recipient(),
            subject = %message.subject,
            "email delivery disabled; notification logged"
        );
        tracing::debug!(body = %message.text, "notification body");
        Ok(())
    }
}
