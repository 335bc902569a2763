//! Outbound webhook delivery contract.

use async_trait::async_trait;

use crate::domain::access_event::NotificationPayload;

/// Errors from a single webhook delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook transport error: {0}")]
    Transport(String),

    #[error("webhook returned status {0}")]
    Status(u16),

    #[error("webhook timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Sends one notification to one endpoint.
///
/// Implementations make exactly one attempt; retry policy belongs to callers,
/// and this service never retries.
///
/// # Implementations
///
/// - [`crate::infrastructure::webhook::HttpNotifier`] - JSON POST over HTTP
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `payload` to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Status`] for any non-2xx response and
    /// [`NotifyError::Transport`] if the request could not be made.
    async fn notify(&self, endpoint: &str, payload: &NotificationPayload)
    -> Result<(), NotifyError>;
}
