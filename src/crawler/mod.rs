//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The frontier (visited set and pending queue)
//! - The bounded worker pool and per-task fetch pipeline
//! - HTML link extraction
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod task;
mod worker;

pub use coordinator::{child_host_depth, run_crawl, Coordinator};
pub use fetcher::{build_http_client, media_type_of, redirect_policy, Fetcher};
pub use frontier::{EnqueueOutcome, Frontier};
pub use parser::extract_links;
pub use task::{CrawlResult, CrawlTask};
pub use worker::{TaskExecutor, WorkerPool};
