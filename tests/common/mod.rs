#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use deeplink_shortener::domain::access_event::AccessEvent;
use deeplink_shortener::domain::entities::{LinkFields, LinkRecord, LinkTargets, NewLink};
use deeplink_shortener::domain::notification_worker::NotificationDispatcher;
use deeplink_shortener::domain::repositories::LinkRepository;
use deeplink_shortener::error::AppError;
use deeplink_shortener::infrastructure::cache::{CacheError, CacheResult, CacheService};
use deeplink_shortener::state::AppState;
use deeplink_shortener::utils::fingerprint::fingerprint;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "https://sho.rt";
pub const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
pub const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8)";
pub const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0";

/// Link store kept in memory, with a partial unique index on live fingerprints.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<LinkRecord>>,
    find_by_id_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Inserts a link with a fixed id and discriminator.
    pub fn seed(&self, id: i64, discriminator: &str, fields: LinkFields) -> LinkRecord {
        let record = record_from(id, discriminator, fields);
        self.links.lock().unwrap().push(record.clone());
        record
    }

    pub fn count(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::unavailable("Database unavailable", json!({})));
        }
        Ok(())
    }
}

fn record_from(id: i64, discriminator: &str, fields: LinkFields) -> LinkRecord {
    LinkRecord {
        id,
        discriminator: discriminator.to_string(),
        fingerprint: fingerprint(&fields.targets),
        targets: fields.targets,
        webhook_url: fields.webhook_url,
        metadata: fields.metadata,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<LinkRecord, AppError> {
        self.check_available()?;
        let mut links = self.links.lock().unwrap();

        if links
            .iter()
            .any(|l| l.fingerprint == new_link.fingerprint && !l.is_deleted())
        {
            return Err(AppError::conflict("Unique constraint violation", json!({})));
        }

        let id = links.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let record = LinkRecord {
            fingerprint: new_link.fingerprint.clone(),
            ..record_from(id, &new_link.discriminator, new_link.fields)
        };
        links.push(record.clone());
        Ok(record)
    }

    async fn find_by_fingerprint(&self, fp: &str) -> Result<Option<LinkRecord>, AppError> {
        self.check_available()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.fingerprint == fp && !l.is_deleted())
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkRecord>, AppError> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<bool, AppError> {
        self.check_available()?;
        let mut links = self.links.lock().unwrap();
        match links.iter_mut().find(|l| l.id == id && !l.is_deleted()) {
            Some(link) => {
                link.is_active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        self.check_available()?;
        let mut links = self.links.lock().unwrap();
        match links.iter_mut().find(|l| l.id == id && !l.is_deleted()) {
            Some(link) => {
                link.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

/// Cache kept in memory. TTLs are recorded but not enforced.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
    ttls: Mutex<HashMap<String, Duration>>,
    broken: AtomicBool,
}

impl InMemoryCache {
    pub fn contains(&self, short_key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(short_key)
    }

    pub fn ttl_of(&self, short_key: &str) -> Option<Duration> {
        self.ttls.lock().unwrap().get(short_key).copied()
    }

    /// Makes every subsequent call fail as if Redis were down.
    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }

    fn check(&self) -> CacheResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, short_key: &str) -> CacheResult<Option<String>> {
        self.check()?;
        Ok(self.entries.lock().unwrap().get(short_key).cloned())
    }

    async fn set(&self, short_key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .insert(short_key.to_string(), value.to_string());
        self.ttls.lock().unwrap().insert(short_key.to_string(), ttl);
        Ok(())
    }

    async fn invalidate(&self, short_key: &str) -> CacheResult<()> {
        self.check()?;
        self.entries.lock().unwrap().remove(short_key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.check().is_ok()
    }
}

pub struct TestContext {
    pub state: AppState,
    pub repository: Arc<InMemoryLinkRepository>,
    pub cache: Arc<InMemoryCache>,
    pub notifications: mpsc::Receiver<AccessEvent>,
}

pub const CACHE_TTL: Duration = Duration::from_secs(3600);

pub fn create_test_context() -> TestContext {
    let repository = Arc::new(InMemoryLinkRepository::default());
    let cache = Arc::new(InMemoryCache::default());
    let (dispatcher, notifications) = NotificationDispatcher::channel(100);

    let state = AppState::new(
        repository.clone(),
        cache.clone(),
        dispatcher,
        CACHE_TTL,
        true,
        BASE_URL,
    );

    TestContext {
        state,
        repository,
        cache,
        notifications,
    }
}

pub fn web_fields(default_fallback_url: &str) -> LinkFields {
    LinkFields {
        targets: LinkTargets {
            default_fallback_url: default_fallback_url.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn app_fields() -> LinkFields {
    LinkFields {
        targets: LinkTargets {
            ios_deep_link: Some("myapp://product/42".to_string()),
            ios_fallback_url: Some("https://apps.apple.com/app/id123".to_string()),
            android_deep_link: Some("myapp://product/42".to_string()),
            android_fallback_url: Some(
                "https://play.google.com/store/apps/details?id=com.example".to_string(),
            ),
            default_fallback_url: "https://example.com/product/42".to_string(),
        },
        ..Default::default()
    }
}
