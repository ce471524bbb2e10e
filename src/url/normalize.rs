use crate::UrlError;
use url::Url;

/// Computes the canonical form of a URL
///
/// # Normalization Steps
///
/// 1. Parse the URL; if it is malformed, return the input unchanged
/// 2. Remove the fragment (everything after #)
/// 3. Strip every trailing slash from the serialized form
///
/// The canonical form is the identity key for the visited and pending sets.
/// Normalization is idempotent: `normalize(&normalize(u)) == normalize(u)`.
///
/// # Examples
///
/// ```
/// use web_scraper::url::normalize;
///
/// assert_eq!(normalize("https://example.com/docs/#intro"), "https://example.com/docs");
/// assert_eq!(normalize("not a url"), "not a url");
/// ```
pub fn normalize(url_str: &str) -> String {
    match Url::parse(url_str) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => url_str.to_string(),
    }
}

/// Parses a URL strictly, accepting only HTTP(S) URLs with a host
///
/// Used where a malformed URL must be reported instead of passed through,
/// e.g. when a fetch is about to be issued.
pub fn try_normalize(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}
