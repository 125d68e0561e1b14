//! Traversal rules: which links to enqueue and what to do with them

use crate::config::RuleEntry;
use crate::crawler::parser::extract_region_links;
use crate::extract::{compile_selector, Page};
use crate::ScrapeError;
use regex::Regex;
use scraper::Selector;
use serde::Deserialize;
use std::collections::HashSet;
use url::Url;

/// What happens to a page reached through a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkAction {
    /// Hand the page to the product extractor
    Extract,
    /// Discover more links on the page
    Follow,
}

/// One compiled traversal rule
#[derive(Debug)]
pub struct LinkRule {
    allow: Regex,
    region: Selector,
    action: LinkAction,
}

impl LinkRule {
    pub fn new(allow: &str, region: &str, action: LinkAction) -> Result<Self, ScrapeError> {
        let allow = Regex::new(allow).map_err(|source| ScrapeError::Pattern {
            pattern: allow.to_string(),
            source,
        })?;

        Ok(Self {
            allow,
            region: compile_selector(region)?,
            action,
        })
    }

    pub fn action(&self) -> LinkAction {
        self.action
    }

    /// Returns true if the pattern is found anywhere in the absolute URL
    pub fn allows(&self, url: &Url) -> bool {
        self.allow.is_match(url.as_str())
    }
}

/// A link a rule selected, with the action it was tagged with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    pub url: Url,
    pub action: LinkAction,
}

/// Ordered set of traversal rules
///
/// Rules are tried in order. A link matched by an earlier rule is not
/// emitted again by a later one on the same page.
#[derive(Debug)]
pub struct TraversalPolicy {
    rules: Vec<LinkRule>,
}

impl TraversalPolicy {
    pub fn new(rules: Vec<LinkRule>) -> Self {
        Self { rules }
    }

    /// Compiles configured rule entries
    pub fn from_entries(entries: &[RuleEntry]) -> Result<Self, ScrapeError> {
        let rules = entries
            .iter()
            .map(|entry| LinkRule::new(&entry.allow, &entry.region, entry.action))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Applies every rule to a page and returns the selected links
    pub fn discover(&self, page: &Page) -> Vec<DiscoveredLink> {
        let mut seen = HashSet::new();
        let mut discovered = Vec::new();

        for rule in &self.rules {
            for url in extract_region_links(page, &rule.region) {
                if !rule.allows(&url) {
                    continue;
                }
                if seen.insert(url.to_string()) {
                    discovered.push(DiscoveredLink {
                        url,
                        action: rule.action,
                    });
                }
            }
        }

        discovered
    }
}
