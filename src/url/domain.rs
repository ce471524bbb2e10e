use url::Url;

/// Extracts the lowercase hostname from a URL
///
/// Ports are not part of the hostname, so `127.0.0.1:8080` and `127.0.0.1:9090`
/// count as the same host for dispersal purposes.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_scraper::url::extract_domain;
///
/// let url = Url::parse("https://Sub.Example.com:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the hostname from a URL string, or None if it does not parse
pub fn host_of(url_str: &str) -> Option<String> {
    Url::parse(url_str).ok().as_ref().and_then(extract_domain)
}
