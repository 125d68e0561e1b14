/// Checks if a host belongs to an allowed domain
///
/// A host matches when it is the allowed domain itself or any subdomain of
/// it, so `"steampowered.com"` admits both `steampowered.com` and
/// `store.steampowered.com`. A leading `"*."` on the allowed domain is
/// accepted and means the same thing.
///
/// # Examples
///
/// ```
/// use steam_products::url::matches_domain;
///
/// assert!(matches_domain("steampowered.com", "store.steampowered.com"));
/// assert!(matches_domain("*.steampowered.com", "steampowered.com"));
/// assert!(!matches_domain("steampowered.com", "steamcommunity.com"));
/// ```
pub fn matches_domain(allowed: &str, host: &str) -> bool {
    let base = allowed.strip_prefix("*.").unwrap_or(allowed);
    host == base || host.ends_with(&format!(".{}", base))
}

/// Checks a host against a list of allowed domains
///
/// An empty list allows every host.
pub fn is_allowed_host(allowed: &[String], host: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|d| matches_domain(d, host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches_domain("steampowered.com", "steampowered.com"));
        assert!(matches_domain("127.0.0.1", "127.0.0.1"));
    }

    #[test]
    fn test_subdomain_match() {
        assert!(matches_domain("steampowered.com", "store.steampowered.com"));
        assert!(matches_domain("steampowered.com", "a.b.steampowered.com"));
    }

    #[test]
    fn test_wildcard_prefix_is_equivalent() {
        assert!(matches_domain("*.steampowered.com", "steampowered.com"));
        assert!(matches_domain("*.steampowered.com", "store.steampowered.com"));
    }

    #[test]
    fn test_no_match_different_domain() {
        assert!(!matches_domain("steampowered.com", "steamcommunity.com"));
        assert!(!matches_domain("steampowered.com", "notsteampowered.com"));
        assert!(!matches_domain("steampowered.com", "steampowered.com.evil.org"));
    }

    #[test]
    fn test_allowed_host_list() {
        let allowed = vec!["steampowered.com".to_string(), "127.0.0.1".to_string()];

        assert!(is_allowed_host(&allowed, "store.steampowered.com"));
        assert!(is_allowed_host(&allowed, "127.0.0.1"));
        assert!(!is_allowed_host(&allowed, "steamcommunity.com"));
    }

    #[test]
    fn test_empty_list_allows_everything() {
        assert!(is_allowed_host(&[], "anything.example"));
    }
}
