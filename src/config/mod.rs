//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every section is optional and defaults to the storefront's layout.
//!
//! # Example
//!
//! ```no_run
//! use steam_products::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("steam.toml")).unwrap();
//! println!("Crawl starts at: {}", config.crawler.start_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_rules, Config, CrawlerConfig, OutputConfig, RuleEntry, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
