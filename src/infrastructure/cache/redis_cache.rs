//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Namespace for link projections.
const KEY_PREFIX: &str = "link:";

/// Redis cache for link projections.
///
/// Uses `ConnectionManager` for connection reuse and automatic reconnects.
/// Errors are returned to the caller, which decides how to degrade.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: KEY_PREFIX.to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, short_key: &str) -> String {
        format!("{}{}", self.key_prefix, short_key)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, short_key: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(short_key);
        let mut conn = self.client.clone();

        let value = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", key, e)))?;

        debug!(
            "Cache {}: {}",
            if value.is_some() { "HIT" } else { "MISS" },
            short_key
        );
        Ok(value)
    }

    async fn set(&self, short_key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let key = self.build_key(short_key);
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&key, value, ttl_seconds)
            .await
            .map_err(|e| CacheError::OperationError(format!("SETEX {}: {}", key, e)))?;

        debug!("Cache SET: {} (TTL: {}s)", short_key, ttl_seconds);
        Ok(())
    }

    async fn invalidate(&self, short_key: &str) -> CacheResult<()> {
        let key = self.build_key(short_key);
        let mut conn = self.client.clone();

        let deleted = conn
            .del::<_, i32>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("DEL {}: {}", key, e)))?;

        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", short_key);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
