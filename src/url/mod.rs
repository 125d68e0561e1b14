//! URL handling module
//!
//! This module provides URL canonicalization, domain extraction, the offsite
//! domain check, and the store's application-id URL scheme.

mod app;
mod domain;
mod matcher;
mod normalize;

pub use app::{app_id, is_valid_app_id, product_url, reviews_url};
pub use domain::extract_domain;
pub use matcher::{is_allowed_host, matches_domain};
pub use normalize::canonicalize_url;
