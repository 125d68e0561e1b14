//! State module for tracking crawl progress
//!
//! - `PageState`: the outcome of every request the crawler makes (queued,
//!   extracted, traversed, age-gated, offsite, or one of the error states)

mod page_state;

pub use page_state::PageState;
