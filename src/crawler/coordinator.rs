//! Crawler coordinator - batch scheduling and crawl policy
//!
//! This module contains the main crawl loop. The coordinator is the only
//! owner of the frontier: it drains batches, dispatches them to the worker
//! pool, and folds each result back in, applying the page depth and host
//! dispersal policy to discovered links.

use crate::auth::{Authenticator, BrowserLogin, CookieStore, LoginDriver};
use crate::config::{validate, CrawlConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{EnqueueOutcome, Frontier};
use crate::crawler::task::{CrawlResult, CrawlTask};
use crate::crawler::worker::{TaskExecutor, WorkerPool};
use crate::output::{CrawlSummary, PersistenceSink};
use crate::url::{extract_domain, host_of, is_allowed_host, normalize, resolve_link};
use crate::ScraperError;
use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<CrawlConfig>,
    frontier: Frontier,
    pool: WorkerPool,
    sink: Arc<PersistenceSink>,
    summary: CrawlSummary,
}

impl Coordinator {
    /// Creates a coordinator that logs in through headless Chromium
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the frontier is seeded
    /// * `Err(ScraperError)` - Invalid configuration or HTTP client setup failed
    pub fn new(config: CrawlConfig) -> Result<Self, ScraperError> {
        Self::with_login_driver(config, Arc::new(BrowserLogin::new()))
    }

    /// Creates a coordinator with a custom login driver
    pub fn with_login_driver(
        config: CrawlConfig,
        driver: Arc<dyn LoginDriver>,
    ) -> Result<Self, ScraperError> {
        check_config(&config)?;

        let sink = Arc::new(PersistenceSink::from_config(&config)?);
        let authenticator = match (&config.login_config, config.protected) {
            (Some(login), true) => Some(Arc::new(Authenticator::new(
                CookieStore::new(&config.cookie_folder),
                login.clone(),
                driver,
            ))),
            _ => None,
        };

        let fetcher = Fetcher::from_config(&config, authenticator, sink.clone())?;
        Ok(Self::assemble(config, Arc::new(fetcher), sink))
    }

    /// Creates a coordinator whose tasks run on the given executor
    pub fn with_executor(
        config: CrawlConfig,
        executor: Arc<dyn TaskExecutor>,
    ) -> Result<Self, ScraperError> {
        check_config(&config)?;
        let sink = Arc::new(PersistenceSink::from_config(&config)?);
        Ok(Self::assemble(config, executor, sink))
    }

    fn assemble(
        config: CrawlConfig,
        executor: Arc<dyn TaskExecutor>,
        sink: Arc<PersistenceSink>,
    ) -> Self {
        let pool = WorkerPool::new(executor, config.concurrency);

        let mut coordinator = Self {
            config: Arc::new(config),
            frontier: Frontier::new(),
            pool,
            sink,
            summary: CrawlSummary::new(Utc::now()),
        };
        coordinator.seed();
        coordinator
    }

    /// Seeds the frontier with the normalized start URLs at depth 0
    fn seed(&mut self) {
        let added = self
            .config
            .start_urls
            .iter()
            .map(|url| self.frontier.enqueue(CrawlTask::seed(normalize(url))))
            .filter(|outcome| *outcome == EnqueueOutcome::Added)
            .count();

        tracing::info!(
            "Seeded frontier with {} of {} start URLs",
            added,
            self.config.start_urls.len()
        );
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Runs the batch loop until the frontier is empty
    ///
    /// A fault inside the loop is caught here and reported in the summary's
    /// `stopped_early` field along with whatever progress was made.
    pub async fn run(&mut self) -> Result<CrawlSummary, ScraperError> {
        self.sink.prepare().await?;

        self.summary = CrawlSummary::new(Utc::now());
        let start_time = Instant::now();

        let outcome = AssertUnwindSafe(self.run_batches(start_time))
            .catch_unwind()
            .await;

        if let Err(panic) = outcome {
            let message = panic_message(panic.as_ref());
            tracing::error!("Crawl loop failed: {}", message);
            self.summary.stopped_early = Some(format!("crawl loop failed: {}", message));
        }

        self.summary.elapsed = start_time.elapsed();
        self.summary.visited = self.frontier.visited_len();
        self.summary.pending = self.frontier.pending_len();

        if let Some(reason) = &self.summary.stopped_early {
            tracing::warn!(
                "Scraping stopped early ({}). Pending: {} | Visited: {}",
                reason,
                self.summary.pending,
                self.summary.visited
            );
        } else {
            tracing::info!(
                "Scraping complete. Total pages visited: {} ({} persisted, {} failed) in {:?}",
                self.summary.visited,
                self.summary.persisted,
                self.summary.failed,
                self.summary.elapsed
            );
        }

        Ok(self.summary.clone())
    }

    async fn run_batches(&mut self, start_time: Instant) {
        let deadline = self.config.crawl_deadline_secs.map(Duration::from_secs);
        let batch_size = self.config.batch_size();

        while !self.frontier.is_empty() {
            if let Some(deadline) = deadline {
                if start_time.elapsed() >= deadline {
                    self.summary.stopped_early = Some(format!(
                        "crawl deadline of {}s exceeded",
                        deadline.as_secs()
                    ));
                    break;
                }
            }

            let batch = self.frontier.drain_batch(batch_size);
            let dispatch = self.select_dispatchable(batch);
            self.summary.batches += 1;

            if !dispatch.is_empty() {
                let results = self.pool.run_batch(dispatch).await;
                for (task, result) in results {
                    self.fold_result(&task, result);
                }
            }

            tracing::info!(
                "[QUEUE] Pending: {} | Visited: {}",
                self.frontier.pending_len(),
                self.frontier.visited_len()
            );
        }
    }

    /// Applies the depth limit and marks the surviving tasks visited
    fn select_dispatchable(&mut self, batch: Vec<CrawlTask>) -> Vec<CrawlTask> {
        let mut dispatch = Vec::with_capacity(batch.len());

        for task in batch {
            if let Some(max_depth) = self.config.max_page_depth {
                if task.depth > max_depth {
                    tracing::debug!("Skipping {} (Depth {} > {})", task.url, task.depth, max_depth);
                    self.summary.depth_skipped += 1;
                    continue;
                }
            }

            if !self.frontier.mark_visited(&task.url) {
                continue;
            }

            tracing::info!(
                "Scraping: {} (Depth: {}, HostDepth: {})",
                task.url,
                task.depth,
                task.host_depth
            );
            dispatch.push(task);
        }

        dispatch
    }

    /// Folds one task result into the crawl state
    fn fold_result(&mut self, task: &CrawlTask, result: CrawlResult) {
        if let Some(error) = &result.error {
            tracing::info!("Skipped {}: {}", task.url, error);
            self.summary.failed += 1;
            return;
        }

        self.summary.persisted += 1;
        tracing::info!(
            "{}: {} → {} ({})",
            if self.config.download_files { "Saved" } else { "Added" },
            task.url,
            result
                .saved_file
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            result.mime_type.as_deref().unwrap_or("unknown")
        );

        // A same-host redirect target is the page that was actually persisted
        if let Some(final_url) = &result.final_url {
            self.frontier.mark_visited(final_url);
        }

        let links_allowed = self
            .config
            .max_page_depth
            .map_or(true, |max_depth| task.depth < max_depth);

        if result.is_html() && links_allowed && !result.links.is_empty() {
            let page_url = result.final_url.as_deref().unwrap_or(&task.url);
            self.enqueue_links(task, page_url, &result.links);
        }
    }

    /// Resolves discovered hrefs and enqueues the in-policy ones
    ///
    /// # Dispersal Rules
    ///
    /// - Same host as the parent: hostDepth is inherited
    /// - Different host: hostDepth is the parent's plus one
    /// - Enqueued when hostDepth <= maxHostDepth, or the host is allow-listed
    ///
    /// Links are resolved against `page_url`, the URL the page was served
    /// from after redirects.
    fn enqueue_links(&mut self, parent: &CrawlTask, page_url: &str, links: &[String]) {
        let base = match Url::parse(page_url) {
            Ok(base) => base,
            Err(e) => {
                tracing::warn!("Cannot resolve links of {}: {}", page_url, e);
                return;
            }
        };
        let base_host = extract_domain(&base);
        let page_host_depth = child_host_depth(
            parent.host_depth,
            host_of(&parent.url).as_deref(),
            base_host.as_deref(),
        );
        let max_host_depth = self.config.max_host_depth.unwrap_or(0);
        let mut added = 0;

        for link in links {
            let resolved = match resolve_link(&base, link) {
                Ok(resolved) => resolved,
                Err(e) => {
                    tracing::info!("Bad link: {} ({})", link, e);
                    continue;
                }
            };

            let host = extract_domain(&resolved);
            let host_depth =
                child_host_depth(page_host_depth, base_host.as_deref(), host.as_deref());
            let allowed_host = host
                .as_deref()
                .is_some_and(|h| is_allowed_host(&self.config.allowed_domains, h));

            if host_depth > max_host_depth && !allowed_host {
                tracing::debug!(
                    "Not following {} (HostDepth {} > {})",
                    resolved,
                    host_depth,
                    max_host_depth
                );
                continue;
            }

            let outcome = self.frontier.enqueue(CrawlTask {
                url: resolved.to_string(),
                depth: parent.depth + 1,
                host_depth,
            });
            if outcome == EnqueueOutcome::Added {
                added += 1;
            }
        }

        tracing::debug!("{} new links from {} ({} found)", added, page_url, links.len());
    }
}

/// Computes a discovered link's hostDepth from its parent's
pub fn child_host_depth(
    parent_host_depth: u32,
    parent_host: Option<&str>,
    host: Option<&str>,
) -> u32 {
    if parent_host == host {
        parent_host_depth
    } else {
        parent_host_depth + 1
    }
}

fn check_config(config: &CrawlConfig) -> Result<(), ScraperError> {
    if let Err(e) = validate(config) {
        tracing::error!("Invalid config provided: {}", e);
        return Err(e.into());
    }
    Ok(())
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs a complete crawl for one configuration
///
/// This function orchestrates the entire crawl process:
///
/// 1. Validate the configuration (invalid config aborts before any I/O)
/// 2. Seed the frontier with normalized start URLs
/// 3. Create the output folder in save mode
/// 4. Drain batches of `2 × concurrency`, dispatch them, fold the results
/// 5. Report the final summary
///
/// # Example
///
/// ```no_run
/// use web_scraper::config::load_config;
/// use web_scraper::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let summary = run_crawl(config).await?;
/// println!("visited {}", summary.visited);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlSummary, ScraperError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
