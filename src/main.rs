//! steam-products main entry point
//!
//! This is the command-line interface for the storefront product scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use steam_products::config::{load_config_with_hash, Config};
use steam_products::crawler::{run_crawl, ProductSpider, Seed};
use steam_products::output::{open_records_sink, print_statistics};
use tracing_subscriber::EnvFilter;

/// steam-products: a storefront product scraper
///
/// Walks the newest-releases listing, follows every product link, answers
/// the age-verification gate, and writes one JSON record per product.
#[derive(Parser, Debug)]
#[command(name = "steam-products")]
#[command(version)]
#[command(about = "Scrapes product pages from the storefront listing", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (storefront defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scrape a single product by application id instead of the listing
    #[arg(long, value_name = "ID")]
    steam_id: Option<String>,

    /// Where to write records ("-" for stdout); overrides the config file
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using storefront defaults");
            Config::default()
        }
    };

    if let Some(output) = cli.output {
        config.output.records_path = output;
    }

    let seed = Seed::from_config(&config, cli.steam_id.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config, &seed)?;
    } else {
        handle_crawl(config, seed).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that records can be written to stdout.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("steam_products=info,warn"),
            1 => EnvFilter::new("steam_products=debug,info"),
            2 => EnvFilter::new("steam_products=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, seed: &Seed) -> anyhow::Result<()> {
    // Compiles the rules and selectors, surfacing any error before a crawl
    let spider = ProductSpider::from_config(config).context("invalid crawl setup")?;

    println!("=== steam-products Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Store URL: {}", config.crawler.store_url);
    println!("  Allowed domains: {}", config.crawler.allowed_domains.join(", "));
    match config.crawler.max_requests {
        0 => println!("  Max requests: unlimited"),
        n => println!("  Max requests: {}", n),
    }
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);

    println!("\nTraversal Rules ({}):", config.rules.len());
    for rule in &config.rules {
        println!("  - {:?}: '{}' within '{}'", rule.action, rule.allow, rule.region);
    }

    println!("\n✓ Configuration is valid");
    for request in spider.start_requests(seed)? {
        println!("✓ Would start with {}", request);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, seed: Seed) -> anyhow::Result<()> {
    match &seed {
        Seed::Listing(url) => tracing::info!("Crawling listing {}", url),
        Seed::Product(id) => tracing::info!("Scraping single product {}", id),
    }

    let records_path = config.output.records_path.clone();
    let mut sink = open_records_sink(&records_path)
        .with_context(|| format!("failed to open records output {}", records_path))?;

    let stats = run_crawl(config, seed, &mut sink)
        .await
        .context("crawl failed")?;

    if records_path != "-" {
        tracing::info!("Records written to: {}", records_path);
    }
    print_statistics(&stats);

    Ok(())
}
