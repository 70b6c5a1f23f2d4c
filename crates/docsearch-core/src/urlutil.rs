//! URL detection, base extraction, and RFC 3986 reference resolution
//! (spec §4.2).
//!
//! Built on the `url` crate rather than hand-rolled string splitting:
//! `url::Url::join` already implements RFC 3986 reference resolution
//! (absolute, `/abs`, `rel/path`, `.`, `..`), so this module is a thin,
//! well-tested wrapper that adds the absolute/base-extraction helpers the
//! rest of the pipeline needs.

use url::Url;

use crate::error::{Error, Result};

/// Returns `true` only when `s` parses as a URL with scheme `http` or
/// `https`.
#[must_use]
pub fn is_absolute(s: &str) -> bool {
    Url::parse(s)
        .ok()
        .is_some_and(|u| matches!(u.scheme(), "http" | "https"))
}

/// Extracts `scheme://authority` (host and port, no path/query/fragment)
/// from an absolute URL.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when `s` is not a parsable absolute URL.
pub fn extract_base(s: &str) -> Result<String> {
    let url = Url::parse(s).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "unsupported scheme in '{s}'"
        )));
    }
    let mut base = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        base.push(':');
        base.push_str(&port.to_string());
    }
    Ok(base)
}

/// Resolves `url` against `base` per spec §4.2:
///
/// - An absolute `url` is returned unchanged.
/// - An empty `url` returns `base` unchanged.
/// - Otherwise, RFC 3986 reference resolution is applied.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when `base` is not a parsable URL, or when
/// joining fails.
pub fn resolve(url_str: &str, base: &str) -> Result<String> {
    if is_absolute(url_str) {
        return Ok(url_str.to_string());
    }
    if url_str.is_empty() {
        return Ok(base.to_string());
    }
    let base_url = Url::parse(base).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let resolved = base_url
        .join(url_str)
        .map_err(|e| Error::InvalidUrl(e.to_string()))?;
    Ok(resolved.to_string())
}
