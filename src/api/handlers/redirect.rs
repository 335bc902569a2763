//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Extracts the User-Agent header, or `""` when absent or not UTF-8.
pub(crate) fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Redirects a short key to the destination for the visitor's platform.
///
/// # Endpoint
///
/// `GET /{token}`
///
/// # Request Flow
///
/// 1. Validate the token shape
/// 2. Resolve through the cache, falling back to the store
/// 3. Queue the webhook notification (fire-and-forget)
/// 4. Pick iOS, Android or default fallback from the User-Agent
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed token.
/// Returns 404 Not Found if the token names no active link.
/// Returns 503 Service Unavailable if the store is unreachable.
pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user_agent = user_agent(&headers);

    let record = state.link_service.resolve(&token, user_agent).await?;
    let destination = record.destination_for(user_agent);

    debug!(short_key = %token, destination, "Redirecting");

    Ok(Redirect::temporary(destination))
}
