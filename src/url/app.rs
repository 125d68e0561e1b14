//! Store application identifiers and the URLs derived from them

use crate::{UrlError, UrlResult};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `/app/<id>/` segment of a product URL path.
static APP_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/app/([^/]+)/").expect("app path pattern is valid"));

/// Extracts the application identifier from a product URL
///
/// Returns `None` when the path has no `/app/<id>/` segment.
///
/// ```
/// use url::Url;
/// use steam_products::url::app_id;
///
/// let url = Url::parse("http://store.steampowered.com/app/570/Dota_2/").unwrap();
/// assert_eq!(app_id(&url), Some("570".to_string()));
/// ```
pub fn app_id(url: &Url) -> Option<String> {
    APP_PATH
        .captures(url.path())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Most-recent reviews listing for an application
pub fn reviews_url(app_id: &str) -> String {
    format!(
        "http://steamcommunity.com/app/{}/reviews/?browsefilter=mostrecent&p=1",
        app_id
    )
}

/// Returns true if `id` can stand as a single `/app/<id>/` path segment
pub fn is_valid_app_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Product page of an application on the given store
///
/// The store URL is treated as a directory even without a trailing slash.
pub fn product_url(store_url: &Url, app_id: &str) -> UrlResult<Url> {
    if !is_valid_app_id(app_id) {
        return Err(UrlError::InvalidAppId(app_id.to_string()));
    }

    let mut base = store_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&format!("app/{}/", app_id))
        .map_err(|e| UrlError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_id_from_product_url() {
        let url = Url::parse("http://store.steampowered.com/app/570/Dota_2/").unwrap();
        assert_eq!(app_id(&url), Some("570".to_string()));
    }

    #[test]
    fn test_app_id_without_slug() {
        let url = Url::parse("http://store.steampowered.com/app/10/").unwrap();
        assert_eq!(app_id(&url), Some("10".to_string()));
    }

    #[test]
    fn test_app_id_from_age_check_submission() {
        let url = Url::parse("https://store.steampowered.com/agecheckset/app/292030/").unwrap();
        assert_eq!(app_id(&url), Some("292030".to_string()));
    }

    #[test]
    fn test_app_id_missing() {
        let url = Url::parse("http://store.steampowered.com/search/?sort_by=Released_DESC").unwrap();
        assert_eq!(app_id(&url), None);

        let url = Url::parse("http://store.steampowered.com/app/570").unwrap();
        assert_eq!(app_id(&url), None);
    }

    #[test]
    fn test_app_id_ignores_query() {
        let url = Url::parse("http://store.steampowered.com/search/?next=/app/5/").unwrap();
        assert_eq!(app_id(&url), None);
    }

    #[test]
    fn test_reviews_url() {
        assert_eq!(
            reviews_url("570"),
            "http://steamcommunity.com/app/570/reviews/?browsefilter=mostrecent&p=1"
        );
    }

    #[test]
    fn test_product_url() {
        let store = Url::parse("http://store.steampowered.com/").unwrap();
        assert_eq!(
            product_url(&store, "570").unwrap().as_str(),
            "http://store.steampowered.com/app/570/"
        );
    }

    #[test]
    fn test_product_url_keeps_store_path() {
        let expected = "http://host.example.com/store/app/570/";
        for store in ["http://host.example.com/store", "http://host.example.com/store/"] {
            let store = Url::parse(store).unwrap();
            assert_eq!(product_url(&store, "570").unwrap().as_str(), expected);
        }
    }

    #[test]
    fn test_product_url_rejects_multi_segment_ids() {
        let store = Url::parse("http://store.steampowered.com/").unwrap();
        for id in ["1/../2", "..", "570/x", "", "570?cc=us", "a b"] {
            assert!(
                matches!(product_url(&store, id), Err(UrlError::InvalidAppId(_))),
                "{:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn test_is_valid_app_id() {
        assert!(is_valid_app_id("570"));
        assert!(is_valid_app_id("292030"));
        assert!(!is_valid_app_id("570/"));
        assert!(!is_valid_app_id("%2E%2E"));
    }
}
