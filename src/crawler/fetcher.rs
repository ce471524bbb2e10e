//! HTTP fetcher implementation
//!
//! This module handles the per-task request pipeline:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Injecting the session `Cookie` header for protected crawls
//! - Classifying the response media type against the accepted set
//! - Delegating accepted bodies to persistence and HTML to link extraction

use crate::auth::Authenticator;
use crate::config::{resolve_media_types, CrawlConfig, HttpConfig};
use crate::crawler::parser::extract_links;
use crate::crawler::task::CrawlResult;
use crate::output::PersistenceSink;
use crate::url::{extract_domain, is_allowed_host, normalize, try_normalize};
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use web_scraper::config::HttpConfig;
/// use web_scraper::crawler::build_http_client;
///
/// let allowed = vec!["*.example.com".to_string()];
/// let client = build_http_client(&HttpConfig::default(), &allowed).unwrap();
/// ```
pub fn build_http_client(
    config: &HttpConfig,
    allowed_domains: &[String],
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(redirect_policy(config.max_redirects, allowed_domains.to_vec()))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Follows redirects that stay on the original host or land on an allow-listed one
///
/// Any other redirect is returned to the caller unfollowed, so a crawl never
/// reaches a host the dispersal policy would not have enqueued.
pub fn redirect_policy(max_redirects: usize, allowed_domains: Vec<String>) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            return attempt.error(format!("too many redirects (limit {})", max_redirects));
        }

        let origin = attempt.previous().first().and_then(extract_domain);
        let next = extract_domain(attempt.url());
        let allowed = next
            .as_deref()
            .is_some_and(|host| is_allowed_host(&allowed_domains, host));

        if origin == next || allowed {
            attempt.follow()
        } else {
            attempt.stop()
        }
    })
}

/// Extracts the bare media type from a Content-Type header value
///
/// # Examples
///
/// ```
/// use web_scraper::crawler::media_type_of;
///
/// assert_eq!(media_type_of("text/HTML; charset=utf-8"), "text/html");
/// assert_eq!(media_type_of(""), "");
/// ```
pub fn media_type_of(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Runs fetch → classify → persist → extract for one URL
pub struct Fetcher {
    client: Client,
    accepted: HashSet<String>,
    authenticator: Option<Arc<Authenticator>>,
    sink: Arc<PersistenceSink>,
}

impl Fetcher {
    pub fn new(
        client: Client,
        accepted: impl IntoIterator<Item = String>,
        authenticator: Option<Arc<Authenticator>>,
        sink: Arc<PersistenceSink>,
    ) -> Self {
        Self {
            client,
            accepted: accepted
                .into_iter()
                .map(|media_type| media_type.to_lowercase())
                .collect(),
            authenticator,
            sink,
        }
    }

    /// Builds a fetcher from a validated configuration
    pub fn from_config(
        config: &CrawlConfig,
        authenticator: Option<Arc<Authenticator>>,
        sink: Arc<PersistenceSink>,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.http, &config.allowed_domains)?;
        let accepted = resolve_media_types(&config.file_types);
        Ok(Self::new(client, accepted, authenticator, sink))
    }

    pub fn accepts(&self, media_type: &str) -> bool {
        self.accepted.contains(media_type)
    }

    /// Processes a URL and reports the outcome as a result value
    ///
    /// Never fails: HTTP errors, rejected media types, login failures and I/O
    /// problems all end up in `CrawlResult::error`.
    pub async fn process(&self, url: &str) -> CrawlResult {
        let mut result = CrawlResult::new(url);
        if let Err(error) = self.run(url, &mut result).await {
            result.error = Some(error);
        }
        result
    }

    async fn run(&self, url: &str, result: &mut CrawlResult) -> Result<(), String> {
        let target = try_normalize(url).map_err(|e| format!("Invalid URL: {}", e))?;

        let cookie_header = match &self.authenticator {
            Some(auth) => Some(auth.cookie_header(&target).await.map_err(|e| e.to_string())?),
            None => None,
        };

        let mut request = self.client.get(target.as_str()).header(ACCEPT, "*/*");
        if let Some(cookie_header) = cookie_header {
            request = request.header(COOKIE, cookie_header);
        }

        let response = request.send().await.map_err(describe_request_error)?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(format!("HTTP error: {}", status.as_u16()));
        }

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("");
            return Err(format!("Redirect to another host not followed: {}", location));
        }

        if normalize(response.url().as_str()) != normalize(target.as_str()) {
            result.final_url = Some(response.url().to_string());
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(media_type_of)
            .unwrap_or_default();

        if !media_type.is_empty() {
            result.mime_type = Some(media_type.clone());
        }

        if !self.accepts(&media_type) {
            return Err(format!("MIME not allowed: {}", media_type));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| format!("Body is unusable: {}", e))?;

        let saved = self
            .sink
            .persist(url, &media_type, &body)
            .await
            .map_err(|e| format!("Body is unusable: {}", e))?;
        result.saved_file = Some(saved);

        if media_type == "text/html" {
            result.links = extract_links(&String::from_utf8_lossy(&body));
        }

        Ok(())
    }
}

/// Classifies a transport failure for the result's error message
fn describe_request_error(error: reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_redirect() {
        format!("Too many redirects: {}", error)
    } else {
        format!("Request failed: {}", error)
    }
}
