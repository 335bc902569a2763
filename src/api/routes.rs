//! Versioned API route configuration.

use crate::api::handlers::{create_link_handler, link_view_handler};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes under `/v1`.
///
/// # Endpoints
///
/// - `POST /v1/urls`          - Create a short link (strict rate limit)
/// - `GET  /v1/urls/{token}`  - JSON view of a resolved link
pub fn v1_routes(behind_proxy: bool) -> Router<AppState> {
    let creation = rate_limit::apply(
        Router::new().route("/urls", post(create_link_handler)),
        rate_limit::STRICT,
        behind_proxy,
    );

    let lookup = rate_limit::apply(
        Router::new().route("/urls/{token}", get(link_view_handler)),
        rate_limit::PUBLIC,
        behind_proxy,
    );

    Router::new().merge(creation).merge(lookup)
}
