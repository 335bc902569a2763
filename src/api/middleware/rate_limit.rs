//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Token bucket parameters for one group of routes.
///
/// One token is replenished every `replenish_every`; at most `burst_size`
/// tokens accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub replenish_every: Duration,
    pub burst_size: u32,
}

/// Resolution endpoints: 50 requests per second, burst 200.
pub const PUBLIC: Quota = Quota {
    replenish_every: Duration::from_millis(20),
    burst_size: 200,
};

/// Creation endpoint: 2 requests per second, burst 20.
pub const STRICT: Quota = Quota {
    replenish_every: Duration::from_millis(500),
    burst_size: 20,
};

/// Applies a per-client-IP rate limit to `router`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// With `behind_proxy == false` the key is the socket peer address, which
/// requires the server to run with `into_make_service_with_connect_info`.
/// With `behind_proxy == true` the key comes from `X-Forwarded-For`,
/// `X-Real-IP` or `Forwarded`, falling back to the peer address.
///
/// # Example
///
/// ```rust,ignore
/// let creation = rate_limit::apply(
///     Router::new().route("/v1/urls", post(create_link_handler)),
///     rate_limit::STRICT,
///     behind_proxy,
/// );
/// ```
pub fn apply(router: Router<AppState>, quota: Quota, behind_proxy: bool) -> Router<AppState> {
    if behind_proxy {
        router.layer(layer(quota, SmartIpKeyExtractor))
    } else {
        router.layer(layer(quota, PeerIpKeyExtractor))
    }
}

fn layer<K: KeyExtractor>(
    quota: Quota,
    extractor: K,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    GovernorLayer::new(Arc::new(config(quota, extractor)))
}

fn config<K: KeyExtractor>(
    quota: Quota,
    extractor: K,
) -> GovernorConfig<K, NoOpMiddleware<QuantaInstant>> {
    GovernorConfigBuilder::default()
        .period(quota.replenish_every.max(Duration::from_millis(1)))
        .burst_size(quota.burst_size.max(1))
        .key_extractor(extractor)
        .finish()
        .expect("quota is clamped to non-zero values")
}
