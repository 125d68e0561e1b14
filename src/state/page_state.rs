/// Page state definitions for tracking crawl progress
///
/// This module defines every state a fetched page can end up in.
use std::fmt;

/// Represents the final state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Success States =====
    /// Product page was turned into a record
    Extracted,

    /// Listing page was traversed for further links
    Traversed,

    /// Age gate was hit and a bypass request was issued
    AgeGated,

    // ===== Error States =====
    /// Page returned HTTP 404 or similar (permanent failure)
    DeadLink,

    /// Page could not be reached (connection refused, DNS failure, timeout)
    Unreachable,

    /// Page returned HTTP 429
    RateLimited,

    /// Page failed for other reasons (HTTP error, repeated age gate, bad gate form)
    Failed,

    /// Page Content-Type is not HTML
    ContentMismatch,
}

impl PageState {
    /// Returns true if the page was handled without error
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Extracted | Self::Traversed | Self::AgeGated)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Short machine-readable name, used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::Traversed => "traversed",
            Self::AgeGated => "age_gated",
            Self::DeadLink => "dead_link",
            Self::Unreachable => "unreachable",
            Self::RateLimited => "rate_limited",
            Self::Failed => "failed",
            Self::ContentMismatch => "content_mismatch",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
