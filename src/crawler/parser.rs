//! Link extraction restricted to page regions
//!
//! Only links inside the elements matched by a region selector are
//! considered, mirroring how the traversal rules scope each pattern to one
//! part of the listing page.

use crate::extract::{compile_selector, Page};
use scraper::Selector;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static LINKS: LazyLock<Selector> =
    LazyLock::new(|| compile_selector("a[href], area[href]").expect("link selector is valid"));

static BASE: LazyLock<Selector> =
    LazyLock::new(|| compile_selector("base[href]").expect("base selector is valid"));

/// Extracts absolute links found inside every `region` element of a page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` and `<area href="...">` inside a region element
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Non-HTTP(S) URLs after resolution
///
/// Relative links resolve against `<base href>` when the page has one,
/// otherwise against the page URL. Each URL is returned once, in document
/// order.
///
/// # Example
///
/// ```
/// use steam_products::crawler::extract_region_links;
/// use steam_products::extract::{compile_selector, Page};
/// use url::Url;
///
/// let html = r#"<div id="results"><a href="/app/1/">One</a></div><a href="/about">About</a>"#;
/// let page = Page::parse(Url::parse("https://store.example.com/search/").unwrap(), html);
/// let links = extract_region_links(&page, &compile_selector("#results").unwrap());
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://store.example.com/app/1/");
/// ```
pub fn extract_region_links(page: &Page, region: &Selector) -> Vec<Url> {
    let base_url = base_url(page);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for region_element in page.select(region) {
        for element in region_element.select(&LINKS) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, &base_url) {
                    if seen.insert(absolute_url.to_string()) {
                        links.push(absolute_url);
                    }
                }
            }
        }
    }

    links
}

/// The URL relative links resolve against
fn base_url(page: &Page) -> Url {
    page.select(&BASE)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| page.url().join(href.trim()).ok())
        .unwrap_or_else(|| page.url().clone())
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
