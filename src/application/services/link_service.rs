//! Link creation and resolution pipeline.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{LinkFields, LinkRecord, NewLink};
use crate::domain::notification_worker::NotificationDispatcher;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::generate_discriminator;
use crate::utils::fingerprint::fingerprint;
use crate::utils::short_key::{split_short_key, validate_short_key};
use crate::utils::url_validator::{
    UrlValidationError, reject_internal_host, validate_deep_link, validate_web_url,
};

/// Result of a create request.
///
/// `short_key` is only set when a new link was written. A request whose
/// targets match a live link reports `created == false` and no key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub created: bool,
    pub short_key: Option<String>,
}

impl CreateOutcome {
    fn created(short_key: String) -> Self {
        Self {
            created: true,
            short_key: Some(short_key),
        }
    }

    fn duplicate() -> Self {
        Self {
            created: false,
            short_key: None,
        }
    }
}

/// Service for creating and resolving short links.
///
/// Resolution is cache-aside: the cache is consulted first, the store on a
/// miss, and the store's answer is written back. The cache is never
/// authoritative, so every cache failure degrades to a store lookup.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    dispatcher: NotificationDispatcher,
    cache_ttl: Duration,
    allow_private_webhooks: bool,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        dispatcher: NotificationDispatcher,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            dispatcher,
            cache_ttl,
            allow_private_webhooks: true,
        }
    }

    /// Controls whether new links may register webhooks on loopback or
    /// private addresses. Allowed by default.
    pub fn with_private_webhooks(mut self, allow: bool) -> Self {
        self.allow_private_webhooks = allow;
        self
    }

    /// Creates a link unless one with the same targets already exists.
    ///
    /// # Deduplication
    ///
    /// Links are identified by the fingerprint of their five target URLs.
    /// Webhook and Open Graph fields do not participate. The store insert is
    /// atomic on the fingerprint, so two concurrent identical requests produce
    /// one link; the loser sees `created == false`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if any URL field is malformed.
    /// Returns [`AppError::Unavailable`] if the store cannot be reached.
    pub async fn create_link(&self, fields: LinkFields) -> Result<CreateOutcome, AppError> {
        validate_fields(&fields, self.allow_private_webhooks)?;

        let fingerprint = fingerprint(&fields.targets);

        if let Some(existing) = self.repository.find_by_fingerprint(&fingerprint).await? {
            debug!(id = existing.id, "Link with identical targets already exists");
            return Ok(CreateOutcome::duplicate());
        }

        let new_link = NewLink {
            discriminator: generate_discriminator(),
            fields,
            fingerprint,
        };

        match self.repository.insert(new_link).await {
            Ok(record) => {
                let short_key = record.short_key()?;
                counter!("links_created_total").increment(1);
                debug!(id = record.id, short_key = %short_key, "Link created");
                Ok(CreateOutcome::created(short_key))
            }
            Err(AppError::Conflict { .. }) => {
                debug!("Concurrent insert won the fingerprint race");
                Ok(CreateOutcome::duplicate())
            }
            Err(e) => Err(e),
        }
    }

    /// Resolves a short key to a live link and queues its access notification.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed key.
    /// Returns [`AppError::NotFound`] when the key names no resolvable link:
    /// unknown id, wrong discriminator, inactive or deleted link all look the same.
    /// Returns [`AppError::Unavailable`] if the store cannot be reached on a cache miss.
    pub async fn resolve(&self, short_key: &str, user_agent: &str) -> Result<LinkRecord, AppError> {
        validate_short_key(short_key)?;

        let record = match self.cached(short_key).await {
            Some(record) => {
                counter!("cache_hits_total").increment(1);
                record
            }
            None => {
                counter!("cache_misses_total").increment(1);
                let record = self.load(short_key).await?;
                self.populate_cache(short_key, &record).await;
                record
            }
        };

        if !record.is_resolvable() {
            return Err(link_not_found(short_key));
        }

        self.dispatcher
            .dispatch(short_key, user_agent, record.webhook_url.as_deref());

        Ok(record)
    }

    /// Looks a link up by short key without the cache and without notifying.
    ///
    /// Inactive and soft-deleted links are returned as stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed key and
    /// [`AppError::NotFound`] if no stored link matches it.
    pub async fn inspect(&self, short_key: &str) -> Result<LinkRecord, AppError> {
        validate_short_key(short_key)?;
        self.load(short_key).await
    }

    /// Activates or deactivates a link and drops its cached projection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key names no live link.
    pub async fn set_active(&self, short_key: &str, active: bool) -> Result<LinkRecord, AppError> {
        let record = self.inspect(short_key).await?;

        if !self.repository.set_active(record.id, active).await? {
            return Err(link_not_found(short_key));
        }
        self.evict(short_key).await;

        Ok(LinkRecord {
            is_active: active,
            ..record
        })
    }

    /// Soft-deletes a link and drops its cached projection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key names no live link.
    pub async fn delete(&self, short_key: &str) -> Result<(), AppError> {
        let record = self.inspect(short_key).await?;

        if !self.repository.soft_delete(record.id).await? {
            return Err(link_not_found(short_key));
        }
        self.evict(short_key).await;

        Ok(())
    }

    /// Reads the cached projection. Any failure counts as a miss.
    async fn cached(&self, short_key: &str) -> Option<LinkRecord> {
        let raw = match self.cache.get(short_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(short_key, "Cache read failed, falling back to store: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<LinkRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(short_key, "Discarding undecodable cache entry: {}", e);
                None
            }
        }
    }

    /// Decodes the key and fetches the matching record from the store.
    async fn load(&self, short_key: &str) -> Result<LinkRecord, AppError> {
        let Some((id, discriminator)) = split_short_key(short_key) else {
            return Err(link_not_found(short_key));
        };
        let Ok(id) = i64::try_from(id) else {
            return Err(link_not_found(short_key));
        };

        match self.repository.find_by_id(id).await? {
            Some(record) if record.discriminator == discriminator => Ok(record),
            _ => Err(link_not_found(short_key)),
        }
    }

    async fn populate_cache(&self, short_key: &str, record: &LinkRecord) {
        let value = match serde_json::to_string(record) {
            Ok(value) => value,
            Err(e) => {
                warn!(short_key, "Failed to serialize link for cache: {}", e);
                return;
            }
        };

        if let Err(e) = self.cache.set(short_key, &value, self.cache_ttl).await {
            warn!(short_key, "Cache write failed: {}", e);
        }
    }

    async fn evict(&self, short_key: &str) {
        if let Err(e) = self.cache.invalidate(short_key).await {
            warn!(short_key, "Cache invalidation failed: {}", e);
        }
    }
}

fn link_not_found(short_key: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "short_key": short_key }))
}

/// Checks every URL-bearing field of a create request.
fn validate_fields(fields: &LinkFields, allow_private_webhooks: bool) -> Result<(), AppError> {
    let targets = &fields.targets;

    check("defaultFallbackUrl", Some(&targets.default_fallback_url), validate_web_url)?;
    check("iosFallbackUrl", targets.ios_fallback_url.as_ref(), validate_web_url)?;
    check("androidFallbackUrl", targets.android_fallback_url.as_ref(), validate_web_url)?;
    check("iosDeepLink", targets.ios_deep_link.as_ref(), validate_deep_link)?;
    check("androidDeepLink", targets.android_deep_link.as_ref(), validate_deep_link)?;
    if allow_private_webhooks {
        check("webhookUrl", fields.webhook_url.as_ref(), validate_web_url)?;
    } else {
        check("webhookUrl", fields.webhook_url.as_ref(), validate_public_web_url)?;
    }
    check("ogImageUrl", fields.metadata.og_image_url.as_ref(), validate_web_url)?;

    Ok(())
}

fn validate_public_web_url(input: &str) -> Result<(), UrlValidationError> {
    reject_internal_host(&validate_web_url(input)?)
}

fn check<T>(
    field: &str,
    value: Option<&String>,
    validate: fn(&str) -> Result<T, UrlValidationError>,
) -> Result<(), AppError> {
    let Some(value) = value else {
        return Ok(());
    };

    validate(value).map(|_| ()).map_err(|e| {
        AppError::bad_request(
            format!("Invalid {}", field),
            json!({ "field": field, "reason": e.to_string() }),
        )
    })
}
