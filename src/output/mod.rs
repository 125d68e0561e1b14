//! Output module for records and crawl reports
//!
//! This module handles:
//! - The `RecordSink` trait the coordinator writes records to
//! - JSON-lines output to a file or stdout
//! - Recording crawl statistics

mod jsonl;
pub mod stats;
mod traits;

pub use jsonl::{open_records_sink, JsonLinesSink};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, RecordSink};
