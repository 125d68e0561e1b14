//! Crawl coordinator - main orchestration logic
//!
//! The coordinator drives the crawl one request at a time: it takes the next
//! request from the scheduler, fetches it, dispatches the page to the
//! spider, writes the records to the sink and schedules the follow-up
//! requests.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch, FetchResult};
use crate::crawler::scheduler::{Enqueued, Scheduler};
use crate::crawler::spider::{ParseOutput, ProductSpider, Seed};
use crate::crawler::CrawlRequest;
use crate::extract::Page;
use crate::output::{CrawlStatistics, RecordSink};
use crate::state::PageState;
use crate::url::{extract_domain, is_allowed_host};
use crate::ScrapeError;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

/// Main crawl coordinator
pub struct Coordinator {
    config: Config,
    client: Client,
    scheduler: Scheduler,
    spider: ProductSpider,
    stats: CrawlStatistics,
}

impl Coordinator {
    /// Creates a coordinator with the seed requests already queued
    pub fn new(config: Config, seed: Seed) -> Result<Self, ScrapeError> {
        let spider = ProductSpider::from_config(&config)?;
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout),
        )?;
        let scheduler = Scheduler::new(config.crawler.max_requests);

        let mut coordinator = Self {
            config,
            client,
            scheduler,
            spider,
            stats: CrawlStatistics::new(),
        };

        // Seeds skip the offsite filter
        for request in coordinator.spider.start_requests(&seed)? {
            tracing::info!("Seeding frontier with {}", request);
            coordinator.scheduler.enqueue(request);
        }

        Ok(coordinator)
    }

    /// Runs the crawl until the frontier is empty or the request cap is hit
    ///
    /// Per-page failures are logged and counted. Only sink errors abort the
    /// run.
    pub async fn run(&mut self, sink: &mut dyn RecordSink) -> Result<CrawlStatistics, ScrapeError> {
        tracing::info!("Starting crawl");

        let mut pages_crawled: u64 = 0;
        let start_time = Instant::now();

        while let Some(request) = self.scheduler.next_request() {
            let state = self.process_request(&request, sink).await?;
            self.stats.record_page(state);
            pages_crawled += 1;

            // Progress reporting every 10 pages
            if pages_crawled % 10 == 0 {
                let rate = pages_crawled as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages crawled, {} records, {} in frontier, {:.2} pages/sec",
                    pages_crawled,
                    self.stats.records_written,
                    self.scheduler.frontier_size(),
                    rate
                );
            }
        }

        if self.scheduler.limit_reached() {
            tracing::info!(
                "Request limit of {} reached, {} requests left in frontier",
                self.config.crawler.max_requests,
                self.scheduler.frontier_size()
            );
        } else {
            tracing::info!("Frontier is empty, crawl complete");
        }

        sink.finish()?;
        self.stats.finish();

        tracing::info!(
            "Crawl completed: {} pages crawled, {} records written in {:?}",
            pages_crawled,
            self.stats.records_written,
            start_time.elapsed()
        );

        Ok(self.stats.clone())
    }

    /// Statistics collected so far
    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Fetches one request and handles the page; returns its final state
    async fn process_request(
        &mut self,
        request: &CrawlRequest,
        sink: &mut dyn RecordSink,
    ) -> Result<PageState, ScrapeError> {
        tracing::debug!("Fetching {}", request);
        self.stats.requests_sent += 1;

        let fetched = fetch(&self.client, request).await;
        let (final_url, body) = match fetched {
            FetchResult::Success {
                final_url,
                status_code,
                content_type,
                body,
            } => {
                tracing::debug!("Got {} ({}) from {}", status_code, content_type, final_url);
                (final_url, body)
            }
            FetchResult::ContentMismatch { ref content_type } => {
                tracing::warn!("Skipping {}: not HTML ({})", request.url, content_type);
                return Ok(PageState::ContentMismatch);
            }
            FetchResult::HttpError {
                status_code, state, ..
            } => {
                tracing::warn!("HTTP {} for {}", status_code, request.url);
                return Ok(state);
            }
            FetchResult::NetworkError { ref error, state } => {
                tracing::warn!("Failed to fetch {}: {}", request.url, error);
                return Ok(state);
            }
        };

        let output = match self.dispatch(request, final_url, &body) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Failed to process {}: {}", request.url, e);
                return Ok(PageState::Failed);
            }
        };

        for record in &output.records {
            sink.write_record(record)?;
            self.stats.records_written += 1;
        }

        for follow_up in output.requests {
            self.schedule(follow_up);
        }

        Ok(output.state)
    }

    /// Parses the body and hands the page to the spider
    ///
    /// The parsed document stays inside this synchronous call.
    fn dispatch(
        &self,
        request: &CrawlRequest,
        final_url: Url,
        body: &str,
    ) -> Result<ParseOutput, ScrapeError> {
        let page = Page::parse(final_url, body);
        self.spider.parse(request, &page)
    }

    /// Queues a follow-up request unless it is offsite or a duplicate
    ///
    /// Form submissions go to the front of the frontier.
    fn schedule(&mut self, request: CrawlRequest) {
        if !self.is_onsite(&request.url) {
            tracing::debug!("Dropping offsite request {}", request.url);
            self.stats.offsite_dropped += 1;
            return;
        }

        let enqueued = if request.is_get() {
            self.scheduler.enqueue(request)
        } else {
            self.scheduler.enqueue_front(request)
        };

        if enqueued == Enqueued::Duplicate {
            self.stats.duplicates_dropped += 1;
        }
    }

    fn is_onsite(&self, url: &Url) -> bool {
        match extract_domain(url) {
            Some(host) => is_allowed_host(&self.config.crawler.allowed_domains, &host),
            None => false,
        }
    }
}

/// Runs a complete crawl
///
/// # Example
///
/// ```no_run
/// use steam_products::config::load_config;
/// use steam_products::crawler::{run_crawl, Seed};
/// use steam_products::output::JsonLinesSink;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("steam.toml"))?;
/// let seed = Seed::from_config(&config, None)?;
/// let mut sink = JsonLinesSink::new(std::io::stdout());
/// let stats = run_crawl(config, seed, &mut sink).await?;
/// println!("{} records", stats.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    seed: Seed,
    sink: &mut dyn RecordSink,
) -> Result<CrawlStatistics, ScrapeError> {
    let mut coordinator = Coordinator::new(config, seed)?;
    coordinator.run(sink).await
}
