//! Frontier management: the visited set and the pending queue
//!
//! This module handles:
//! - Canonical URL identity for deduplication
//! - FIFO pending queue with commit-on-drain batches
//! - The monotonically growing visited set
//!
//! The frontier has a single owner (the coordinator), so it needs no locks.

use crate::crawler::task::CrawlTask;
use crate::url::normalize;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Why a task was not added to the pending queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Added to the pending queue
    Added,
    /// URL already processed this run
    AlreadyVisited,
    /// URL already waiting in the pending queue
    AlreadyPending,
    /// URL could not be parsed
    Malformed,
}

/// Visited set plus pending queue
#[derive(Debug, Default)]
pub struct Frontier {
    /// Canonical URLs already dispatched
    visited: HashSet<String>,

    /// Tasks awaiting dispatch, oldest first
    pending: VecDeque<CrawlTask>,

    /// Canonical URLs present in `pending`
    pending_keys: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task unless its canonical URL is visited or already pending
    ///
    /// The task URL is rewritten to its canonical form. Malformed URLs are
    /// logged and dropped.
    pub fn enqueue(&mut self, task: CrawlTask) -> EnqueueOutcome {
        let canonical = normalize(&task.url);

        if Url::parse(&canonical).is_err() {
            tracing::info!("Bad link: {} (malformed URL)", task.url);
            return EnqueueOutcome::Malformed;
        }

        if self.visited.contains(&canonical) {
            return EnqueueOutcome::AlreadyVisited;
        }

        if !self.pending_keys.insert(canonical.clone()) {
            return EnqueueOutcome::AlreadyPending;
        }

        tracing::info!(
            "Enqueued: {} (Depth: {}, HostDepth: {})",
            canonical,
            task.depth,
            task.host_depth
        );

        self.pending.push_back(CrawlTask {
            url: canonical,
            ..task
        });
        EnqueueOutcome::Added
    }

    /// Removes up to `n` tasks from the pending queue
    ///
    /// Drained tasks leave the pending set immediately, so a rediscovery of
    /// the same URL before it is marked visited can queue it again; the
    /// coordinator's visited check on dispatch keeps it from running twice.
    pub fn drain_batch(&mut self, n: usize) -> Vec<CrawlTask> {
        let take = n.min(self.pending.len());
        let batch: Vec<CrawlTask> = self.pending.drain(..take).collect();

        for task in &batch {
            self.pending_keys.remove(&task.url);
        }

        batch
    }

    /// Marks a URL as visited, returning false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(normalize(url))
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&normalize(url))
    }

    pub fn is_pending(&self, url: &str) -> bool {
        self.pending_keys.contains(&normalize(url))
    }

    /// Returns the number of tasks awaiting dispatch
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of URLs processed so far
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Returns whether the pending queue is empty
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterates over visited canonical URLs
    pub fn visited(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }
}
