//! Content fingerprint used as the deduplication key.
//!
//! # On-disk contract
//!
//! The digest is SHA-256, lower-case hex, over the five target URLs joined by
//! `:` in this order:
//!
//! 1. iOS deep link
//! 2. iOS fallback URL
//! 3. Android deep link
//! 4. Android fallback URL
//! 5. Default fallback URL
//!
//! Absent fields take part as empty strings. Webhook and Open Graph fields are
//! never hashed. Changing any of this orphans the fingerprints already stored.

use crate::domain::entities::LinkTargets;
use sha2::{Digest, Sha256};

/// Length of a hex-encoded fingerprint.
pub const FINGERPRINT_LEN: usize = 64;

/// Computes the fingerprint of a set of link targets.
pub fn fingerprint(targets: &LinkTargets) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or("").to_owned();

    let mut hasher = Sha256::new();
    hasher.update(format!(
        "{}:{}:{}:{}:{}",
        field(&targets.ios_deep_link),
        field(&targets.ios_fallback_url),
        field(&targets.android_deep_link),
        field(&targets.android_fallback_url),
        targets.default_fallback_url,
    ));

    hex::encode(hasher.finalize())
}
