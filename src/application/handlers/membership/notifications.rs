//! Best-effort notification dispatch.

use std::sync::Arc;

use crate::ports::{Notification, Notifier};

/// Sends `notification` on a background task.
///
/// Failures are logged at `warn` and otherwise ignored.
pub(crate) fn dispatch(notifier: &Arc<dyn Notifier>, notification: Notification) {
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        match notifier.send(&notification).await {
            Ok(()) => tracing::debug!(
                kind = notification.kind(),
                member_id = %notification.member_id(),
                "notification sent"
            ),
            Err(e) => tracing::warn!(
                kind = notification.kind(),
                member_id = %notification.member_id(),
                error = %e,
                "notification failed"
            ),
        }
    });
}
