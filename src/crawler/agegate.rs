//! Age-verification interstitial detection and bypass
//!
//! Mature titles redirect to an interstitial whose path contains
//! `/agecheck/app`. The interstitial holds a form; submitting it with a
//! birth date far enough in the past sets a session cookie and returns the
//! product page.

use crate::crawler::{CrawlRequest, LinkAction};
use crate::extract::{child_elements, compile_selector, Page};
use crate::ScrapeError;
use scraper::Selector;
use tracing::warn;
use url::Url;

/// Path fragment that marks the interstitial
pub const AGE_CHECK_MARKER: &str = "/agecheck/app";

/// Bypass submissions allowed per product before the page counts as failed
pub const MAX_GATE_BYPASSES: u8 = 1;

/// Birth date submitted with the bypass form
pub const BYPASS_BIRTH_DATE: [(&str, &str); 3] =
    [("ageDay", "1"), ("ageMonth", "1"), ("ageYear", "1955")];

const GATE_FORM: &str = "#agegate_box form";

/// Returns true if the URL is the age-verification interstitial
pub fn is_gated(url: &Url) -> bool {
    url.path().contains(AGE_CHECK_MARKER)
}

/// Builds bypass submissions for gated pages
#[derive(Debug)]
pub struct AgeGate {
    form: Selector,
}

impl AgeGate {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            form: compile_selector(GATE_FORM)?,
        })
    }

    /// Builds the POST that answers the gate on `page`
    ///
    /// The first form inside the gate box is used. Its first direct `input`
    /// child is carried over as-is, followed by the birth date fields. The
    /// returned request is tagged for extraction; the caller sets the bypass
    /// count.
    pub fn build_bypass(&self, page: &Page) -> Result<CrawlRequest, ScrapeError> {
        let missing = || ScrapeError::MissingGateForm {
            url: page.url().to_string(),
        };

        let form = page.select(&self.form).next().ok_or_else(missing)?;
        let action = form
            .value()
            .attr("action")
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(missing)?;
        let action_url = page.url().join(action)?;

        let mut fields = Vec::with_capacity(BYPASS_BIRTH_DATE.len() + 1);
        match child_elements(form, "input").next() {
            Some(input) => {
                if let Some(name) = input.value().attr("name") {
                    let value = input.value().attr("value").unwrap_or_default();
                    fields.push((name.to_string(), value.to_string()));
                }
            }
            None => warn!(
                "Age gate form at {} has no input field, submitting birth date only",
                page.url()
            ),
        }
        fields.extend(
            BYPASS_BIRTH_DATE
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );

        Ok(CrawlRequest::post_form(
            action_url,
            fields,
            LinkAction::Extract,
        ))
    }
}
