//! Crawl task and result values exchanged between the coordinator and workers

use std::path::PathBuf;

/// A URL awaiting dispatch, with its position in the crawl graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTask {
    /// Canonical URL
    pub url: String,

    /// Link hops from the seed this task was discovered from
    pub depth: u32,

    /// Distinct-host hops from the seed
    pub host_depth: u32,
}

impl CrawlTask {
    /// Creates a seed task at depth 0 / hostDepth 0
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
            host_depth: 0,
        }
    }
}

/// Outcome of one fetch → classify → persist → extract task
///
/// Produced once per dispatched task and consumed once by the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    pub url: String,

    /// Where the request ended up after a same-host redirect
    pub final_url: Option<String>,

    /// Media type of the response, stripped of parameters
    pub mime_type: Option<String>,

    /// Raw href values, in document order without duplicates
    pub links: Vec<String>,

    /// Path the body was saved to, or the URL log that was appended to
    pub saved_file: Option<PathBuf>,

    /// Why the task produced nothing usable
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Creates a result that carries only an error
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// True when the body was HTML and link extraction applies
    pub fn is_html(&self) -> bool {
        self.mime_type.as_deref() == Some("text/html")
    }
}
