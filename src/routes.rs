//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{token}`          - Short link redirect
//! - `GET  /health`           - Health check: DB, cache, notification queue
//! - `POST /v1/urls`          - Link creation
//! - `GET  /v1/urls/{token}`  - Link view
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Per-request deadline; expiry drops in-flight cache and store calls
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
/// - `request_timeout` - deadline for each request; a request that runs out
///   of time gets `408 Request Timeout`
pub fn app_router(
    state: AppState,
    behind_proxy: bool,
    request_timeout: Duration,
) -> NormalizePath<Router> {
    let redirect = rate_limit::apply(
        Router::new().route("/{token}", get(redirect_handler)),
        rate_limit::PUBLIC,
        behind_proxy,
    );

    let timeout = TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout);

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(redirect)
        .nest("/v1", api::routes::v1_routes(behind_proxy))
        .with_state(state)
        .layer(timeout)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
