//! Bounded worker pool
//!
//! Every task runs on its own tokio task, gated by a semaphore sized to the
//! configured concurrency. A panic inside a task is caught at the join point
//! and turned into an error result for that task alone; the coordinator's
//! frontier is never touched from inside a worker.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::task::{CrawlResult, CrawlTask};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Executes one task end-to-end and reports the outcome
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(&self, url: &str) -> CrawlResult;
}

#[async_trait]
impl TaskExecutor for Fetcher {
    async fn execute(&self, url: &str) -> CrawlResult {
        self.process(url).await
    }
}

/// Fans a batch out to at most `concurrency` concurrent tasks
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    executor: Arc<dyn TaskExecutor>,
}

impl WorkerPool {
    pub fn new(executor: Arc<dyn TaskExecutor>, concurrency: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            executor,
        }
    }

    /// Runs every task in the batch and waits for all of them
    ///
    /// Results come back in batch order, one per task.
    pub async fn run_batch(&self, batch: Vec<CrawlTask>) -> Vec<(CrawlTask, CrawlResult)> {
        let mut handles = Vec::with_capacity(batch.len());

        for task in batch {
            let semaphore = self.semaphore.clone();
            let executor = self.executor.clone();
            let url = task.url.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return CrawlResult::failed(url, "Worker pool closed"),
                };
                executor.execute(&url).await
            });

            handles.push((task, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (task, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Worker for {} crashed: {}", task.url, e);
                    CrawlResult::failed(task.url.clone(), format!("Worker crashed: {}", e))
                }
            };
            results.push((task, result));
        }

        results
    }
}
