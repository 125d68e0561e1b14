//! Crawler module for fetching and dispatching store pages
//!
//! This module contains the core crawling logic, including:
//! - Traversal rules and region-restricted link extraction
//! - Age-gate detection and bypass
//! - The spider that turns pages into records and follow-up requests
//! - HTTP fetching, request scheduling, and overall crawl coordination

mod agegate;
mod coordinator;
mod fetcher;
mod parser;
mod policy;
mod request;
mod scheduler;
mod spider;

pub use agegate::{is_gated, AgeGate, AGE_CHECK_MARKER, BYPASS_BIRTH_DATE, MAX_GATE_BYPASSES};
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch, user_agent, FetchResult, MAX_REDIRECTS};
pub use parser::extract_region_links;
pub use policy::{DiscoveredLink, LinkAction, LinkRule, TraversalPolicy};
pub use request::{CrawlRequest, RequestMethod};
pub use scheduler::{Enqueued, Scheduler};
pub use spider::{ParseOutput, ProductSpider, Seed};
