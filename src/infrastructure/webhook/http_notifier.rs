//! HTTP webhook client.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

use crate::domain::access_event::NotificationPayload;
use crate::domain::notifier::{Notifier, NotifyError};

/// Posts access notifications as JSON over HTTP(S).
///
/// One `reqwest::Client` is shared by every delivery so connections are pooled.
/// Endpoints are posted to as stored; internal-address filtering happens when a
/// link is created (`WEBHOOK_ALLOW_PRIVATE`).
#[derive(Clone)]
pub struct HttpNotifier {
    client: Client,
    timeout: Duration,
}

impl HttpNotifier {
    /// Builds a notifier whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Transport`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, endpoint: &str, payload: &NotificationPayload) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout(self.timeout)
                } else {
                    NotifyError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        debug!(endpoint, status = status.as_u16(), "Webhook accepted");
        Ok(())
    }
}
