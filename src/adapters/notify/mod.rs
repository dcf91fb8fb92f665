//! Notification adapters.
//!
//! - `ResendNotifier` - email through the Resend API
//! - `LoggingNotifier` - logs instead of sending, for local runs

mod logging;
mod resend;
mod templates;

pub use logging::LoggingNotifier;
pub use resend::ResendNotifier;
pub use templates::{render, EmailMessage};
