//! Crawl summary reporting

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Final statistics for one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the batch loop
    pub elapsed: Duration,

    /// Canonical URLs processed
    pub visited: usize,

    /// Tasks still pending when the loop ended (0 on normal completion)
    pub pending: usize,

    /// Tasks whose content was saved or logged
    pub persisted: usize,

    /// Tasks that ended with an error
    pub failed: usize,

    /// Tasks skipped for exceeding the page depth limit
    pub depth_skipped: usize,

    /// Scheduling rounds executed
    pub batches: usize,

    /// Why the loop stopped before the frontier was empty
    pub stopped_early: Option<String>,
}

impl CrawlSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            elapsed: Duration::ZERO,
            visited: 0,
            pending: 0,
            persisted: 0,
            failed: 0,
            depth_skipped: 0,
            batches: 0,
            stopped_early: None,
        }
    }

    /// Returns true if the crawl ran until the frontier was empty
    pub fn is_complete(&self) -> bool {
        self.stopped_early.is_none() && self.pending == 0
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    println!("  Batches: {}", summary.batches);
    println!();

    println!("  Visited: {}", summary.visited);
    println!("  Persisted: {}", summary.persisted);
    println!("  Failed: {}", summary.failed);
    println!("  Skipped (depth): {}", summary.depth_skipped);
    println!("  Pending: {}", summary.pending);

    if let Some(reason) = &summary.stopped_early {
        println!();
        println!("  Stopped early: {}", reason);
    }
}
