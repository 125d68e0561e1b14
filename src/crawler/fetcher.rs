//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client (user agent, timeouts, cookie store)
//! - GET requests and URL-encoded form POSTs
//! - Redirect following (the final URL is what the spider sees)
//! - Error classification into page states

use crate::config::UserAgentConfig;
use crate::crawler::{CrawlRequest, RequestMethod};
use crate::state::PageState;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed per request
pub const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// HTTP error that maps to a specific page state
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// The page state this error maps to
        state: PageState,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// The page state this error maps to
        state: PageState,
    },
}

/// Formats the user agent string
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// The cookie store keeps the session cookie set by the age-gate
/// submission, so later requests for the same product are not gated again.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use steam_products::config::UserAgentConfig;
/// use steam_products::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent(config))
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a request and classifies the outcome
///
/// # Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 404, 410 | DeadLink |
/// | HTTP 429 | RateLimited |
/// | Other non-2xx | Failed |
/// | Non-HTML Content-Type | ContentMismatch |
/// | Timeout | Unreachable |
/// | Connection refused | Unreachable |
/// | Too many redirects | Failed |
///
/// Nothing is retried.
pub async fn fetch(client: &Client, request: &CrawlRequest) -> FetchResult {
    let builder = match &request.method {
        RequestMethod::Get => client.get(request.url.clone()),
        RequestMethod::Post { form } => client.post(request.url.clone()).form(form),
    };

    match builder.send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().clone();

            if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                    state: PageState::DeadLink,
                };
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                    state: PageState::RateLimited,
                };
            }

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                    state: PageState::Failed,
                };
            }

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();

            if !is_html(&content_type) {
                return FetchResult::ContentMismatch { content_type };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    content_type,
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                    state: PageState::Failed,
                },
            }
        }
        Err(e) => classify_error(&e),
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            state: PageState::Unreachable,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: "Connection refused".to_string(),
            state: PageState::Unreachable,
        }
    } else if e.is_redirect() {
        FetchResult::NetworkError {
            error: format!("Too many redirects (limit {})", MAX_REDIRECTS),
            state: PageState::Failed,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            state: PageState::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            user_agent(&create_test_config()),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=UTF-8"));
        assert!(is_html("Text/HTML"));
        assert!(is_html("application/xhtml+xml"));

        assert!(!is_html(""));
        assert!(!is_html("application/json"));
        assert!(!is_html("image/png"));
    }
}
