//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - FIFO queue of requests to fetch
//! - Duplicate suppression of GET requests by canonical URL
//! - The overall request cap

use crate::crawler::CrawlRequest;
use crate::url::canonicalize_url;
use std::collections::{HashSet, VecDeque};

/// Outcome of offering a request to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    Queued,
    Duplicate,
}

/// Scheduler manages the frontier queue
///
/// GET requests are fingerprinted by their canonical URL and enqueued at most
/// once per crawl. Form submissions are never deduplicated; the age-gate
/// bypass goes to the front of the queue so the gated product is finished
/// before the crawl moves on.
pub struct Scheduler {
    /// Requests waiting to be fetched, in order
    frontier: VecDeque<CrawlRequest>,

    /// Canonical URLs of every GET request ever queued
    seen: HashSet<String>,

    /// Maximum requests to hand out (0 = unlimited)
    max_requests: u32,

    /// Requests handed out so far
    dispatched: u32,
}

impl Scheduler {
    pub fn new(max_requests: u32) -> Self {
        Self {
            frontier: VecDeque::new(),
            seen: HashSet::new(),
            max_requests,
            dispatched: 0,
        }
    }

    /// Adds a request to the back of the frontier
    pub fn enqueue(&mut self, request: CrawlRequest) -> Enqueued {
        if !self.mark_seen(&request) {
            tracing::trace!("Duplicate request dropped: {}", request);
            return Enqueued::Duplicate;
        }

        self.frontier.push_back(request);
        Enqueued::Queued
    }

    /// Adds a request to the front of the frontier
    pub fn enqueue_front(&mut self, request: CrawlRequest) -> Enqueued {
        if !self.mark_seen(&request) {
            tracing::trace!("Duplicate request dropped: {}", request);
            return Enqueued::Duplicate;
        }

        self.frontier.push_front(request);
        Enqueued::Queued
    }

    /// Gets the next request to fetch
    ///
    /// Returns `None` when the frontier is empty or the request cap has been
    /// reached.
    pub fn next_request(&mut self) -> Option<CrawlRequest> {
        if self.limit_reached() {
            return None;
        }

        let request = self.frontier.pop_front()?;
        self.dispatched += 1;
        tracing::debug!("Returning request: {}", request);
        Some(request)
    }

    /// Returns true once `max_requests` requests have been handed out
    pub fn limit_reached(&self) -> bool {
        self.max_requests > 0 && self.dispatched >= self.max_requests
    }

    /// Returns the number of requests in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Records the fingerprint of a GET request; false if already seen
    fn mark_seen(&mut self, request: &CrawlRequest) -> bool {
        match fingerprint(request) {
            Some(key) => self.seen.insert(key),
            None => true,
        }
    }
}

/// Deduplication key: the canonical URL of a GET request
fn fingerprint(request: &CrawlRequest) -> Option<String> {
    if !request.is_get() {
        return None;
    }

    let key = canonicalize_url(request.url.as_str())
        .map(|url| url.to_string())
        .unwrap_or_else(|_| request.url.to_string());
    Some(key)
}
