//! Cache service trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key/value cache for link projections, keyed by short key.
///
/// The cache is never authoritative. Callers treat read errors as misses and
/// write errors as no-ops; implementations just report what happened.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached value for a short key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on cache hit
    /// - `Ok(None)` on cache miss
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend could not be queried.
    async fn get(&self, short_key: &str) -> CacheResult<Option<String>>;

    /// Stores a value for a short key, expiring after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend rejected the write.
    async fn set(&self, short_key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Removes a cached value.
    ///
    /// Used when a link is deactivated or deleted.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backend rejected the delete.
    async fn invalidate(&self, short_key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
