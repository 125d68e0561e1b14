//! Fetched pages and the small query helpers built on top of `scraper`

use crate::ScrapeError;
use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched HTML document together with the URL it was served from
///
/// The URL is the final one after redirects, which is what the age-gate
/// check and the identifier extraction look at.
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// Parses an HTML body fetched from `url`
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    /// The URL the page was served from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Every element matching `selector`, in document order
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.document.select(selector)
    }
}

/// Compiles a CSS selector, mapping the parse error into a [`ScrapeError`]
pub fn compile_selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// All descendant text of an element, concatenated
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Only the text nodes that are direct children of an element
pub fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect()
}

/// Direct element children with the given tag name
pub fn child_elements<'a>(
    element: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}
