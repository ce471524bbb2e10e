use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; WebScraper/1.0)";

/// Main crawl configuration
///
/// Field names follow the camelCase keys of the crawl request payload, so the
/// same structure loads from TOML files and JSON request bodies alike.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlConfig {
    /// Seed URLs, crawled at depth 0 / hostDepth 0
    #[serde(default)]
    pub start_urls: Vec<String>,

    /// Maximum link hops from a seed (None means unlimited)
    #[serde(default)]
    pub max_page_depth: Option<u32>,

    /// Maximum number of distinct-host hops from a seed
    #[serde(default)]
    pub max_host_depth: Option<u32>,

    /// Hosts exempt from the host dispersal cap (exact or "*.example.com")
    #[serde(default)]
    pub allowed_domains: Vec<String>,

    /// Number of tasks executing at once
    #[serde(default)]
    pub concurrency: usize,

    /// Accepted file type labels ("html", "pdf") or raw media types
    #[serde(default)]
    pub file_types: Vec<String>,

    /// Save bodies to `output_folder` (true) or log URLs to `url_log_file_path` (false)
    #[serde(default)]
    pub download_files: bool,

    /// Folder receiving saved bodies
    #[serde(default)]
    pub output_folder: Option<PathBuf>,

    /// File receiving one accepted URL per line
    #[serde(default)]
    pub url_log_file_path: Option<PathBuf>,

    /// Whether pages require a cookie-authenticated session
    #[serde(default)]
    pub protected: bool,

    /// Scripted login used when `protected` is set
    #[serde(default)]
    pub login_config: Option<LoginConfig>,

    /// Folder holding `<hostname>.txt` cookie files
    #[serde(default = "default_cookie_folder")]
    pub cookie_folder: PathBuf,

    /// Overall crawl deadline in seconds
    #[serde(default)]
    pub crawl_deadline_secs: Option<u64>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl CrawlConfig {
    /// Creates a config with the given seeds and defaults everywhere else
    ///
    /// The result is not valid until a host depth, file types and an output
    /// target are filled in.
    pub fn new(start_urls: Vec<String>) -> Self {
        Self {
            start_urls,
            max_page_depth: None,
            max_host_depth: None,
            allowed_domains: Vec::new(),
            concurrency: 0,
            file_types: Vec::new(),
            download_files: false,
            output_folder: None,
            url_log_file_path: None,
            protected: false,
            login_config: None,
            cookie_folder: default_cookie_folder(),
            crawl_deadline_secs: None,
            http: HttpConfig::default(),
        }
    }

    /// Batch size drained from the frontier each scheduling round
    pub fn batch_size(&self) -> usize {
        self.concurrency.max(1) * 2
    }
}

/// Scripted browser login settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginConfig {
    /// Login page; when absent the URL of the triggering task is used
    #[serde(default)]
    pub login_url: Option<String>,

    pub username_selector: String,
    pub username: String,
    pub password_selector: String,
    pub password: String,
    pub submit_selector: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_cookie_folder() -> PathBuf {
    PathBuf::from("cookies")
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}
