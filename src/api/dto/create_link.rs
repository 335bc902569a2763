//! DTOs for the link creation endpoint.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use crate::domain::entities::{LinkFields, LinkMetadata, LinkTargets};

/// Request body for `POST /v1/urls`.
///
/// Empty strings are treated the same as absent fields.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub ios_deep_link: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub ios_fallback_url: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub android_deep_link: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub android_fallback_url: Option<String>,

    #[validate(length(min = 1, message = "defaultFallbackUrl is required"))]
    pub default_fallback_url: String,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub webhook_url: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(length(max = 255))]
    pub og_title: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(length(max = 500))]
    pub og_description: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub og_image_url: Option<String>,
}

impl From<CreateLinkRequest> for LinkFields {
    fn from(request: CreateLinkRequest) -> Self {
        LinkFields {
            targets: LinkTargets {
                ios_deep_link: request.ios_deep_link,
                ios_fallback_url: request.ios_fallback_url,
                android_deep_link: request.android_deep_link,
                android_fallback_url: request.android_fallback_url,
                default_fallback_url: request.default_fallback_url,
            },
            webhook_url: request.webhook_url,
            metadata: LinkMetadata {
                og_title: request.og_title,
                og_description: request.og_description,
                og_image_url: request.og_image_url,
            },
        }
    }
}

/// Response body for `POST /v1/urls`.
///
/// `short_key` and `short_url` are omitted when nothing was created.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
}
