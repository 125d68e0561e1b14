use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use steam_products::url::extract_domain;
///
/// let url = Url::parse("http://Store.SteamPowered.com/app/570/").unwrap();
/// assert_eq!(extract_domain(&url), Some("store.steampowered.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
