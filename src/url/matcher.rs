/// Checks if a hostname matches an allow-list pattern
///
/// Two pattern forms are supported:
/// 1. Exact: "example.com" matches only "example.com"
/// 2. Wildcard: "*.example.com" matches "example.com" and any subdomain of it
///
/// Comparison ignores ASCII case, since hostnames are case-insensitive and
/// allow-lists are written by hand.
///
/// # Examples
///
/// ```
/// use web_scraper::url::matches_wildcard;
///
/// assert!(matches_wildcard("example.com", "EXAMPLE.com"));
/// assert!(!matches_wildcard("example.com", "blog.example.com"));
/// assert!(matches_wildcard("*.example.com", "api.v2.example.com"));
/// assert!(!matches_wildcard("*.example.com", "myexample.com"));
/// ```
pub fn matches_wildcard(pattern: &str, host: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => host == base || host.ends_with(&format!(".{}", base)),
        None => host == pattern,
    }
}

/// Returns true if the host is on the allow-list
pub fn is_allowed_host(allowed: &[String], host: &str) -> bool {
    allowed.iter().any(|pattern| matches_wildcard(pattern, host))
}
