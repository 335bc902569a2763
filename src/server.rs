//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::config::{Config, mask_connection_string};
use crate::domain::notification_worker::{NotificationDispatcher, run_notification_worker};
use crate::domain::notifier::Notifier;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::infrastructure::webhook::HttpNotifier;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Number of connection attempts before startup gives up.
const DB_CONNECT_ATTEMPTS: usize = 5;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (retried with backoff)
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Background notification worker
/// - Axum HTTP server
///
/// On Ctrl+C the server stops accepting requests, finishes in-flight ones,
/// and gives queued notifications a bounded grace period to drain.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let cache = connect_cache(&config).await;

    let notifier: Arc<dyn Notifier> = Arc::new(
        HttpNotifier::new(config.notify_timeout())
            .map_err(|e| anyhow::anyhow!("Failed to build webhook client: {}", e))?,
    );
    let (dispatcher, notify_rx) = NotificationDispatcher::channel(config.notify_queue_capacity);
    let worker = tokio::spawn(run_notification_worker(
        notify_rx,
        notifier,
        config.notify_concurrency,
        config.notify_timeout(),
    ));
    tracing::info!("Notification worker started");

    let repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let state = AppState::new(
        repository,
        cache,
        dispatcher,
        config.cache_ttl(),
        config.allow_private_webhooks,
        config.base_url.clone(),
    );

    let app = app_router(state, config.behind_proxy, config.request_timeout());

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned every dispatcher; the worker stops once it has drained.
    let grace = config.notify_timeout() + Duration::from_secs(1);
    if tokio::time::timeout(grace, worker).await.is_err() {
        tracing::warn!("Notification worker did not drain within {:?}", grace);
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects to PostgreSQL, retrying with exponential backoff.
///
/// # Errors
///
/// Returns the last connection error after all attempts fail.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    // 200ms, 400ms, 800ms, ...
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(DB_CONNECT_ATTEMPTS - 1);

    let database_url = config.database_url.as_str();

    Retry::spawn(strategy, move || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!(
                    "Database connection to {} failed: {}",
                    mask_connection_string(database_url),
                    e
                )
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

/// Picks the cache backend: Redis when configured and reachable, otherwise NullCache.
async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
