//! Handler for link creation endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::create_link::{CreateLinkRequest, CreateLinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link unless an identical one already exists.
///
/// # Endpoint
///
/// `POST /v1/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "iosDeepLink": "myapp://product/42",
///   "iosFallbackUrl": "https://apps.apple.com/app/id123",
///   "androidDeepLink": "",
///   "androidFallbackUrl": "",
///   "defaultFallbackUrl": "https://example.com/product/42",
///   "webhookUrl": "https://hooks.example.com/clicks",
///   "ogTitle": "Product 42"
/// }
/// ```
///
/// # Responses
///
/// - **201 Created**: `{"created": true, "short_key": "aB9b", "short_url": "https://sho.rt/aB9b"}`
/// - **200 OK**: `{"created": false}` when a live link has the same targets
/// - **400 Bad Request**: unparsable body or invalid field
/// - **503 Service Unavailable**: store unreachable
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let outcome = state.link_service.create_link(payload.into()).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let short_url = outcome.short_key.as_deref().map(|key| state.short_url(key));

    Ok((
        status,
        Json(CreateLinkResponse {
            created: outcome.created,
            short_key: outcome.short_key,
            short_url,
        }),
    ))
}
