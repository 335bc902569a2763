//! Access event model for webhook notifications.

use serde::Serialize;

/// An in-memory record of one resolution, queued for webhook delivery.
///
/// Never persisted. It exists only for a single delivery attempt.
///
/// # Usage Flow
///
/// 1. Created by [`crate::application::services::LinkService::resolve`]
/// 2. Queued through [`crate::domain::notification_worker::NotificationDispatcher`]
/// 3. Delivered by [`crate::domain::notification_worker::run_notification_worker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub short_key: String,
    pub user_agent: String,
    pub webhook_url: String,
}

impl AccessEvent {
    pub fn new(short_key: &str, user_agent: &str, webhook_url: &str) -> Self {
        Self {
            short_key: short_key.to_string(),
            user_agent: user_agent.to_string(),
            webhook_url: webhook_url.to_string(),
        }
    }

    /// JSON body sent to the webhook endpoint.
    pub fn payload(&self) -> NotificationPayload {
        NotificationPayload {
            short_key: self.short_key.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Wire format of a webhook call: `{"short_key": ..., "user_agent": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub short_key: String,
    pub user_agent: String,
}
