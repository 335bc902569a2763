//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::notification_worker::NotificationDispatcher;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub dispatcher: NotificationDispatcher,
    /// Public origin, no trailing slash.
    pub base_url: String,
}

impl AppState {
    /// Wires the link service from its collaborators.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        dispatcher: NotificationDispatcher,
        cache_ttl: std::time::Duration,
        allow_private_webhooks: bool,
        base_url: impl Into<String>,
    ) -> Self {
        let link_service = Arc::new(
            LinkService::new(repository.clone(), cache.clone(), dispatcher.clone(), cache_ttl)
                .with_private_webhooks(allow_private_webhooks),
        );

        Self {
            link_service,
            repository,
            cache,
            dispatcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Absolute short URL for a key.
    pub fn short_url(&self, short_key: &str) -> String {
        format!("{}/{}", self.base_url, short_key)
    }
}
