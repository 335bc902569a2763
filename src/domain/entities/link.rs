//! Link entity: one shortened destination with its platform targets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::utils::short_key::merge_short_key;

/// The URL-bearing fields that identify a link for deduplication.
///
/// See [`crate::utils::fingerprint`] for how these are hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTargets {
    pub ios_deep_link: Option<String>,
    pub ios_fallback_url: Option<String>,
    pub android_deep_link: Option<String>,
    pub android_fallback_url: Option<String>,
    pub default_fallback_url: String,
}

/// Open Graph display metadata. Never part of the fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image_url: Option<String>,
}

/// Everything a caller supplies when creating a link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFields {
    pub targets: LinkTargets,
    pub webhook_url: Option<String>,
    pub metadata: LinkMetadata,
}

/// A stored link.
///
/// Serialized as JSON when projected into the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: i64,
    pub discriminator: String,
    pub targets: LinkTargets,
    pub webhook_url: Option<String>,
    pub metadata: LinkMetadata,
    pub fingerprint: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl LinkRecord {
    /// Returns true if the link has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true if the link may be served to visitors.
    pub fn is_resolvable(&self) -> bool {
        self.is_active && !self.is_deleted()
    }

    /// Encodes this link's short key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the stored id is negative, which the
    /// store never assigns.
    pub fn short_key(&self) -> Result<String, AppError> {
        let id = u64::try_from(self.id).map_err(|_| {
            AppError::internal("Link id out of range", json!({ "id": self.id }))
        })?;

        Ok(merge_short_key(&self.discriminator, id))
    }

    /// Picks the redirect target for a visitor.
    ///
    /// iOS and Android visitors go to their platform fallback when one is set;
    /// everyone else gets the default fallback URL. Deep links and Open Graph
    /// fields are never redirect targets; they are returned by the JSON view.
    pub fn destination_for(&self, user_agent: &str) -> &str {
        let targets = &self.targets;

        let platform = match Platform::from_user_agent(user_agent) {
            Platform::Ios => targets.ios_fallback_url.as_deref(),
            Platform::Android => targets.android_fallback_url.as_deref(),
            Platform::Other => None,
        };

        platform.unwrap_or(&targets.default_fallback_url)
    }
}

/// Visitor platform, as far as the User-Agent tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Other,
}

impl Platform {
    pub fn from_user_agent(user_agent: &str) -> Self {
        if ["iPhone", "iPad", "iPod"]
            .iter()
            .any(|device| user_agent.contains(device))
        {
            Platform::Ios
        } else if user_agent.contains("Android") {
            Platform::Android
        } else {
            Platform::Other
        }
    }
}

/// Input data for inserting a new link. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub discriminator: String,
    pub fields: LinkFields,
    pub fingerprint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";
    const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/121.0";

    fn create_test_record() -> LinkRecord {
        LinkRecord {
            id: 123,
            discriminator: "ab".to_string(),
            targets: LinkTargets {
                ios_deep_link: Some("myapp://item/1".to_string()),
                ios_fallback_url: Some("https://apps.apple.com/app/id1".to_string()),
                android_deep_link: Some("myapp://item/1".to_string()),
                android_fallback_url: Some("https://play.google.com/store/apps/details?id=x".to_string()),
                default_fallback_url: "https://example.com".to_string(),
            },
            webhook_url: None,
            metadata: LinkMetadata::default(),
            fingerprint: "0".repeat(64),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_short_key() {
        let record = create_test_record();
        assert_eq!(record.short_key().unwrap(), "aB9b");
    }

    #[test]
    fn test_short_key_negative_id() {
        let record = LinkRecord {
            id: -1,
            ..create_test_record()
        };
        assert!(matches!(record.short_key(), Err(AppError::Internal { .. })));
    }

    #[test]
    fn test_is_resolvable() {
        let record = create_test_record();
        assert!(record.is_resolvable());

        let inactive = LinkRecord {
            is_active: false,
            ..record.clone()
        };
        assert!(!inactive.is_resolvable());

        let deleted = LinkRecord {
            deleted_at: Some(Utc::now()),
            ..record
        };
        assert!(deleted.is_deleted());
        assert!(!deleted.is_resolvable());
    }

    #[test]
    fn test_platform_detection() {
        assert_eq!(Platform::from_user_agent(IPHONE_UA), Platform::Ios);
        assert_eq!(Platform::from_user_agent("Mozilla/5.0 (iPad; CPU OS 17_0)"), Platform::Ios);
        assert_eq!(Platform::from_user_agent(ANDROID_UA), Platform::Android);
        assert_eq!(Platform::from_user_agent(DESKTOP_UA), Platform::Other);
        assert_eq!(Platform::from_user_agent(""), Platform::Other);
    }

    #[test]
    fn test_destination_for_platforms() {
        let record = create_test_record();

        assert_eq!(record.destination_for(IPHONE_UA), "https://apps.apple.com/app/id1");
        assert_eq!(
            record.destination_for(ANDROID_UA),
            "https://play.google.com/store/apps/details?id=x"
        );
        assert_eq!(record.destination_for(DESKTOP_UA), "https://example.com");
    }

    #[test]
    fn test_destination_falls_back_to_default() {
        let mut record = create_test_record();
        record.targets.ios_fallback_url = None;
        record.targets.android_fallback_url = None;

        assert_eq!(record.destination_for(IPHONE_UA), "https://example.com");
        assert_eq!(record.destination_for(ANDROID_UA), "https://example.com");
    }

    #[test]
    fn test_cache_projection_round_trip() {
        let record = create_test_record();
        let json = serde_json::to_string(&record).unwrap();
        let restored: LinkRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
    }
}
