//! DTO for the link view endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::LinkRecord;

/// JSON view of a resolved link returned by `GET /v1/urls/{token}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    pub short_key: String,
    pub ios_deep_link: Option<String>,
    pub ios_fallback_url: Option<String>,
    pub android_deep_link: Option<String>,
    pub android_fallback_url: Option<String>,
    pub default_fallback_url: String,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LinkView {
    pub fn new(short_key: &str, record: LinkRecord) -> Self {
        let LinkRecord {
            targets,
            metadata,
            created_at,
            ..
        } = record;

        Self {
            short_key: short_key.to_string(),
            ios_deep_link: targets.ios_deep_link,
            ios_fallback_url: targets.ios_fallback_url,
            android_deep_link: targets.android_deep_link,
            android_fallback_url: targets.android_fallback_url,
            default_fallback_url: targets.default_fallback_url,
            og_title: metadata.og_title,
            og_description: metadata.og_description,
            og_image_url: metadata.og_image_url,
            created_at,
        }
    }
}
