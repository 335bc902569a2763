//! Handler for the link view endpoint.

use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};

use crate::api::dto::link::LinkView;
use crate::api::handlers::redirect::user_agent;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the resolved link as JSON.
///
/// # Endpoint
///
/// `GET /v1/urls/{token}`
///
/// Resolution is the same as for a redirect, including the webhook
/// notification. Inactive and deleted links are reported as not found.
pub async fn link_view_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LinkView>, AppError> {
    let record = state
        .link_service
        .resolve(&token, user_agent(&headers))
        .await?;

    Ok(Json(LinkView::new(&token, record)))
}
