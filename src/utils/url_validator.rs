//! URL validation for link creation fields.
//!
//! Web destinations (fallbacks, webhooks, images) must be absolute HTTP(S)
//! URLs with a host. Deep links only need to be absolute: app schemes such as
//! `myapp://product/42` are the whole point of them.
//!
//! Both kinds must be plain printable ASCII. `Url::parse` silently drops tabs
//! and newlines, so the stored string would differ from what was validated and
//! could not be sent back as a `Location` header.

use url::{Host, Url};

/// Errors that can occur while validating a URL field.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must contain only printable ASCII characters; percent-encode anything else")]
    IllegalCharacters,

    #[error("URL must not point at a loopback, private or link-local address")]
    InternalHost,
}

fn parse(input: &str) -> Result<Url, UrlValidationError> {
    if !input.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(UrlValidationError::IllegalCharacters);
    }

    Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))
}

/// Validates an absolute HTTP or HTTPS URL.
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and any other non-web scheme, so a
/// redirect can never be turned into script execution.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for malformed or relative URLs,
/// [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes, and
/// [`UrlValidationError::MissingHost`] when no host is present, and
/// [`UrlValidationError::IllegalCharacters`] for whitespace, control or
/// non-ASCII characters.
pub fn validate_web_url(input: &str) -> Result<Url, UrlValidationError> {
    let url = parse(input)?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

/// Validates an absolute URL with any scheme, as used by app deep links.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for malformed or relative URLs
/// and [`UrlValidationError::IllegalCharacters`] as for [`validate_web_url`].
pub fn validate_deep_link(input: &str) -> Result<Url, UrlValidationError> {
    let url = parse(input)?;

    if matches!(url.scheme(), "javascript" | "data") {
        return Err(UrlValidationError::UnsupportedProtocol);
    }

    Ok(url)
}

/// Rejects web URLs whose host is `localhost` or a literal loopback,
/// private, link-local or unspecified IP address.
///
/// Only the literal host is inspected. A public name that resolves to an
/// internal address still passes.
///
/// # Errors
///
/// Returns [`UrlValidationError::InternalHost`] for such hosts.
pub fn reject_internal_host(url: &Url) -> Result<(), UrlValidationError> {
    let internal = match url.host() {
        Some(Host::Ipv4(ip)) => {
            ip.is_loopback()
                || ip.is_private()
                || ip.is_link_local()
                || ip.is_unspecified()
                || ip.is_broadcast()
        }
        Some(Host::Ipv6(ip)) => {
            ip.is_loopback()
                || ip.is_unspecified()
                || ip.is_unique_local()
                || ip.is_unicast_link_local()
                || ip
                    .to_ipv4_mapped()
                    .is_some_and(|v4| v4.is_loopback() || v4.is_private() || v4.is_link_local())
        }
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        None => true,
    };

    if internal {
        return Err(UrlValidationError::InternalHost);
    }

    Ok(())
}
