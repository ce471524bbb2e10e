//! Web Scraper: a depth- and dispersal-bounded crawl engine
//!
//! This crate crawls a set of seed URLs, follows discovered links under page
//! depth and cross-host dispersal limits, optionally authenticates through a
//! scripted browser login, filters responses by media type and persists the
//! accepted content (or just its address) for downstream ingestion.

pub mod auth;
pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Login failed for {domain}: {message}")]
    Login { domain: String, message: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, ScraperError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{run_crawl, CrawlResult, CrawlTask};
pub use output::CrawlSummary;
pub use url::{extract_domain, normalize};
