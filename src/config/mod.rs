//! Configuration module for the crawl engine
//!
//! This module handles loading, parsing, and validating crawl configurations
//! from TOML or JSON files, and maps file type labels to media types.
//!
//! # Example
//!
//! ```no_run
//! use web_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use concurrency: {}", config.concurrency);
//! ```

mod mime;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CrawlConfig, HttpConfig, LoginConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use mime::{media_type_for, resolve_media_types};
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
