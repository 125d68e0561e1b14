//! Outgoing requests produced by the spider

use crate::crawler::LinkAction;
use std::fmt;
use url::Url;

/// HTTP method plus, for form submissions, the URL-encoded fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    /// POST with an `application/x-www-form-urlencoded` body
    Post { form: Vec<(String, String)> },
}

/// A request for the engine to fetch, tagged with what to do with the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub url: Url,
    pub method: RequestMethod,

    /// How the fetched page is dispatched
    pub action: LinkAction,

    /// Age-gate bypasses already spent on the way to this request
    pub gate_bypasses: u8,
}

impl CrawlRequest {
    /// A GET request
    pub fn get(url: Url, action: LinkAction) -> Self {
        Self {
            url,
            method: RequestMethod::Get,
            action,
            gate_bypasses: 0,
        }
    }

    /// A form POST request
    pub fn post_form(url: Url, form: Vec<(String, String)>, action: LinkAction) -> Self {
        Self {
            url,
            method: RequestMethod::Post { form },
            action,
            gate_bypasses: 0,
        }
    }

    pub fn with_gate_bypasses(mut self, gate_bypasses: u8) -> Self {
        self.gate_bypasses = gate_bypasses;
        self
    }

    pub fn is_get(&self) -> bool {
        matches!(self.method, RequestMethod::Get)
    }

    /// Form fields of a POST request
    pub fn form(&self) -> Option<&[(String, String)]> {
        match &self.method {
            RequestMethod::Get => None,
            RequestMethod::Post { form } => Some(form),
        }
    }
}

impl fmt::Display for CrawlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = if self.is_get() { "GET" } else { "POST" };
        write!(f, "{} {}", method, self.url)
    }
}
