//! The product spider: seeds, and per-page dispatch
//!
//! Pages come back from the fetcher tagged with the action of the request
//! that produced them. Listing pages yield more requests, product pages
//! yield records, and gated product pages yield a bypass submission.

use crate::config::Config;
use crate::crawler::agegate::{is_gated, AgeGate, MAX_GATE_BYPASSES};
use crate::crawler::{CrawlRequest, LinkAction, TraversalPolicy};
use crate::extract::{Page, ProductExtractor, ProductRecord};
use crate::state::PageState;
use crate::url::{is_valid_app_id, product_url};
use crate::{ScrapeError, UrlError};
use tracing::debug;
use url::Url;

/// Where a crawl starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// Traverse the listing at this URL
    Listing(Url),
    /// Fetch a single product page by application id
    Product(String),
}

impl Seed {
    /// The product seed when an id is given, the configured listing otherwise
    ///
    /// An id that is not a single path segment is rejected up front.
    pub fn from_config(config: &Config, steam_id: Option<&str>) -> Result<Self, ScrapeError> {
        match steam_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) if !is_valid_app_id(id) => {
                Err(UrlError::InvalidAppId(id.to_string()).into())
            }
            Some(id) => Ok(Seed::Product(id.to_string())),
            None => Ok(Seed::Listing(Url::parse(&config.crawler.start_url)?)),
        }
    }
}

/// Result of dispatching one page
#[derive(Debug)]
pub struct ParseOutput {
    /// State the page ends in
    pub state: PageState,
    pub records: Vec<ProductRecord>,
    pub requests: Vec<CrawlRequest>,
}

impl ParseOutput {
    fn record(record: ProductRecord) -> Self {
        Self {
            state: PageState::Extracted,
            records: vec![record],
            requests: Vec::new(),
        }
    }

    fn gated(bypass: CrawlRequest) -> Self {
        Self {
            state: PageState::AgeGated,
            records: Vec::new(),
            requests: vec![bypass],
        }
    }

    fn traversed(requests: Vec<CrawlRequest>) -> Self {
        Self {
            state: PageState::Traversed,
            records: Vec::new(),
            requests,
        }
    }
}

pub struct ProductSpider {
    policy: TraversalPolicy,
    extractor: ProductExtractor,
    age_gate: AgeGate,
    store_url: Url,
}

impl ProductSpider {
    pub fn new(
        policy: TraversalPolicy,
        extractor: ProductExtractor,
        age_gate: AgeGate,
        store_url: Url,
    ) -> Self {
        Self {
            policy,
            extractor,
            age_gate,
            store_url,
        }
    }

    /// Builds the spider described by a configuration
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        Ok(Self::new(
            TraversalPolicy::from_entries(&config.rules)?,
            ProductExtractor::new()?,
            AgeGate::new()?,
            Url::parse(&config.crawler.store_url)?,
        ))
    }

    /// Initial requests for a seed
    pub fn start_requests(&self, seed: &Seed) -> Result<Vec<CrawlRequest>, ScrapeError> {
        let request = match seed {
            Seed::Listing(url) => CrawlRequest::get(url.clone(), LinkAction::Follow),
            Seed::Product(id) => {
                CrawlRequest::get(product_url(&self.store_url, id)?, LinkAction::Extract)
            }
        };
        Ok(vec![request])
    }

    /// Dispatches a fetched page according to the request that produced it
    pub fn parse(&self, request: &CrawlRequest, page: &Page) -> Result<ParseOutput, ScrapeError> {
        match request.action {
            LinkAction::Follow => Ok(self.traverse(page)),
            LinkAction::Extract => self.parse_product(request, page),
        }
    }

    fn traverse(&self, page: &Page) -> ParseOutput {
        let requests: Vec<CrawlRequest> = self
            .policy
            .discover(page)
            .into_iter()
            .map(|link| CrawlRequest::get(link.url, link.action))
            .collect();

        debug!("Discovered {} links on {}", requests.len(), page.url());
        ParseOutput::traversed(requests)
    }

    fn parse_product(
        &self,
        request: &CrawlRequest,
        page: &Page,
    ) -> Result<ParseOutput, ScrapeError> {
        if !is_gated(page.url()) {
            return Ok(ParseOutput::record(self.extractor.extract(page)));
        }

        if request.gate_bypasses >= MAX_GATE_BYPASSES {
            return Err(ScrapeError::RepeatedAgeGate {
                url: page.url().to_string(),
                attempts: request.gate_bypasses,
            });
        }

        let bypass = self
            .age_gate
            .build_bypass(page)?
            .with_gate_bypasses(request.gate_bypasses + 1);
        debug!("Age gate at {}, submitting to {}", page.url(), bypass.url);
        Ok(ParseOutput::gated(bypass))
    }
}
