//! Crawl statistics
//!
//! Counters collected by the coordinator while the crawl runs, and the
//! end-of-run report.

use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Requests sent to the network
    pub requests_sent: u64,

    /// Count of pages by final state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Records handed to the sink
    pub records_written: u64,

    /// GET requests dropped because their canonical URL was already queued
    pub duplicates_dropped: u64,

    /// Follow-up requests dropped because their host is not allowed
    pub offsite_dropped: u64,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            requests_sent: 0,
            pages_by_state: HashMap::new(),
            records_written: 0,
            duplicates_dropped: 0,
            offsite_dropped: 0,
        }
    }

    /// Counts a page ending in `state`
    pub fn record_page(&mut self, state: PageState) {
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Total pages handled without error
    pub fn total_successes(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.is_success())
            .map(|(_, count)| count)
            .sum()
    }

    /// Total pages in an error state
    pub fn total_errors(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout may be carrying the records themselves.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        eprintln!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        eprintln!("  Duration: {}s", seconds);
    }
    eprintln!("  Requests sent: {}", stats.requests_sent);
    eprintln!("  Records written: {}", stats.records_written);
    eprintln!("  Duplicates dropped: {}", stats.duplicates_dropped);
    eprintln!("  Offsite dropped: {}", stats.offsite_dropped);
    eprintln!();

    eprintln!("Pages by State:");
    let total: u64 = stats.pages_by_state.values().sum();
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

    for (state, count) in state_counts {
        let percentage = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        eprintln!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    eprintln!();

    eprintln!(
        "Succeeded: {}, Errors: {} ({} products extracted)",
        stats.total_successes(),
        stats.total_errors(),
        stats.count(PageState::Extracted)
    );
}
