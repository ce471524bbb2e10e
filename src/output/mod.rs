//! Output module for persisting crawl results and reporting
//!
//! This module handles:
//! - Saving accepted bodies or logging accepted URLs for downstream ingestion
//! - Summarizing a crawl run

mod sink;
pub mod stats;

pub use sink::{extension_for, file_name_for, PersistenceSink, SinkMode};
pub use stats::{print_summary, CrawlSummary};
