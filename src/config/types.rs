use crate::crawler::LinkAction;
use serde::Deserialize;

/// Main configuration structure
///
/// Every section is optional; a missing section takes the storefront
/// defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            rules: default_rules(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Store root; product pages live at `<store-url>app/<id>/`
    #[serde(rename = "store-url")]
    pub store_url: String,

    /// Listing page the discovery crawl starts from
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Hosts (and their subdomains) the crawler may request
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Maximum number of requests to send (0 = unlimited)
    #[serde(rename = "max-requests")]
    pub max_requests: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            store_url: "http://store.steampowered.com/".to_string(),
            start_url: "http://store.steampowered.com/search/?sort_by=Released_DESC".to_string(),
            allowed_domains: vec!["steampowered.com".to_string()],
            max_requests: 0,
            request_timeout: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "steam-products".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/steam-products".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON-lines file receiving one record per product ("-" = stdout)
    #[serde(rename = "records-path")]
    pub records_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_path: "products.jl".to_string(),
        }
    }
}

/// One traversal rule: links matching `allow` inside `region` get `action`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleEntry {
    /// Regex searched for in the absolute link URL
    pub allow: String,

    /// CSS selector of the page region links are taken from
    pub region: String,

    /// What to do with a matching link
    pub action: LinkAction,
}

/// The storefront's two rules: product links in the search results, and
/// pagination links in the pager.
pub fn default_rules() -> Vec<RuleEntry> {
    vec![
        RuleEntry {
            allow: "/app/(.+)/".to_string(),
            region: "#search_result_container".to_string(),
            action: LinkAction::Extract,
        },
        RuleEntry {
            allow: r"page=(\d+)".to_string(),
            region: ".search_pagination_right".to_string(),
            action: LinkAction::Follow,
        },
    ]
}
