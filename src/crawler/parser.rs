//! HTML link extraction
//!
//! This module parses HTML bodies with a tolerant HTML5 parser and collects
//! the `href` of every anchor element. Hrefs are returned raw; resolution
//! against the page URL and scheme filtering happen in the coordinator.

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracts anchor hrefs from an HTML document
///
/// # Extraction Rules
///
/// - Every `<a href="...">` counts, wherever it appears in the document
/// - Empty `href` attributes are ignored
/// - Order follows the document; duplicates keep their first occurrence
/// - Malformed markup never fails: the parser recovers and keeps going
///
/// # Example
///
/// ```
/// use web_scraper::crawler::extract_links;
///
/// let html = r#"<a href="/a">A</a><p><a href="/b">B</a><a href="/a">again</a>"#;
/// assert_eq!(extract_links(html), vec!["/a", "/b"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .filter(|href| seen.insert(href.to_string()))
        .map(str::to_string)
        .collect()
}
