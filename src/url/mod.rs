//! URL handling module
//!
//! This module provides canonical URL normalization, hostname extraction,
//! allow-list matching and resolution of discovered hrefs.

mod domain;
mod matcher;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, host_of};
pub use matcher::{is_allowed_host, matches_wildcard};
pub use normalize::{normalize, try_normalize};

/// Resolves a discovered href against the page it was found on
///
/// Relative hrefs are joined onto `base`. Only HTTP(S) results are accepted;
/// `mailto:`, `javascript:` and other schemes are reported as errors so the
/// caller can log and drop them.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_scraper::url::resolve_link;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let url = resolve_link(&base, "../api").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/api");
/// assert!(resolve_link(&base, "mailto:someone@example.com").is_err());
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Result<Url, UrlError> {
    let resolved = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    match resolved.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if resolved.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(resolved)
}
