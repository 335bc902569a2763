//! Short key codec.
//!
//! A short key packs a numeric link identifier and a 2-character discriminator
//! into one alphanumeric token:
//!
//! ```text
//! <d0> <base62(id)> <d1>
//! ```
//!
//! The base-62 alphabet is `A-Z`, `a-z`, `0-9`, in that order, so `A` is the
//! zero symbol. This ordering defines the external token format and must not
//! change once tokens have been handed out.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Base-62 alphabet shared by identifiers and discriminators.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const BASE: u64 = ALPHABET.len() as u64;

/// Number of characters in a discriminator.
pub const DISCRIMINATOR_LEN: usize = 2;

/// Shortest token the resolver accepts (discriminator plus one digit).
pub const MIN_SHORT_KEY_LEN: usize = DISCRIMINATOR_LEN + 1;

static SHORT_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("short key regex is valid"));

/// Encodes an identifier in base 62. Zero encodes to `"A"`, never to `""`.
pub fn encode_base62(mut id: u64) -> String {
    if id == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::new();
    while id > 0 {
        digits.push(ALPHABET[(id % BASE) as usize]);
        id /= BASE;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Decodes a base-62 string. An empty input decodes to 0.
///
/// Returns `None` if a character is outside the alphabet or the value
/// does not fit in a `u64`.
pub fn decode_base62(encoded: &str) -> Option<u64> {
    encoded.bytes().try_fold(0u64, |acc, byte| {
        let digit = digit_value(byte)?;
        acc.checked_mul(BASE)?.checked_add(digit)
    })
}

fn digit_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        _ => return None,
    };
    Some(value as u64)
}

/// Builds a short key from a discriminator and an identifier.
///
/// The first discriminator character is prepended and the second appended
/// to the base-62 identifier.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(merge_short_key("ab", 123), "aB9b");
/// assert_eq!(merge_short_key("xy", 0), "xAy");
/// ```
pub fn merge_short_key(discriminator: &str, id: u64) -> String {
    debug_assert!(is_discriminator(discriminator));

    let mut chars = discriminator.chars();
    let front = chars.next().unwrap_or(ALPHABET[0] as char);
    let back = chars.next().unwrap_or(ALPHABET[0] as char);

    let mut key = String::with_capacity(DISCRIMINATOR_LEN + 11);
    key.push(front);
    key.push_str(&encode_base62(id));
    key.push(back);
    key
}

/// Splits a short key into `(identifier, discriminator)`.
///
/// A 2-character key has an empty interior and decodes to identifier 0.
/// Returns `None` for keys shorter than 2 characters, non-ASCII keys, or an
/// interior that is not valid base 62 within `u64`. Callers are expected to
/// run [`validate_short_key`] first.
pub fn split_short_key(short_key: &str) -> Option<(u64, String)> {
    if short_key.len() < DISCRIMINATOR_LEN || !short_key.is_ascii() {
        return None;
    }

    let last = short_key.len() - 1;
    let discriminator = format!("{}{}", &short_key[..1], &short_key[last..]);
    let id = decode_base62(&short_key[1..last])?;

    Some((id, discriminator))
}

/// Returns true if `value` is exactly two alphanumeric ASCII characters.
pub fn is_discriminator(value: &str) -> bool {
    value.len() == DISCRIMINATOR_LEN && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Checks the shape of an incoming short key.
///
/// # Rules
///
/// - At least 3 characters
/// - Only `A-Z`, `a-z`, `0-9`
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated. This is distinct
/// from the not-found outcome of a well-formed key that names no link.
pub fn validate_short_key(short_key: &str) -> Result<(), AppError> {
    if short_key.len() < MIN_SHORT_KEY_LEN {
        return Err(AppError::bad_request(
            "Short key must be at least 3 characters long",
            json!({ "provided_length": short_key.len() }),
        ));
    }

    if !SHORT_KEY_REGEX.is_match(short_key) {
        return Err(AppError::bad_request(
            "Short key must contain only English letters and digits",
            json!({ "short_key": short_key }),
        ));
    }

    Ok(())
}
