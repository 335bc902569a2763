//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Every lookup misses, so every resolution goes to the store.
///
/// # Use Cases
///
/// - Development environments without Redis
/// - Fallback when Redis connection fails at startup
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _short_key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _short_key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _short_key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();

        cache.set("aB9b", "{}", Duration::from_secs(60)).await.unwrap();
        assert!(cache.get("aB9b").await.unwrap().is_none());
        assert!(cache.invalidate("aB9b").await.is_ok());
        assert!(cache.health_check().await);
    }
}
