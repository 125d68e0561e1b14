use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use steam_products::config::load_config;
///
/// let config = load_config(Path::new("steam.toml")).unwrap();
/// println!("Starting at: {}", config.crawler.start_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that record files can be traced back to the exact
/// configuration that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::LinkAction;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r##"
[crawler]
store-url = "https://store.example.com/"
start-url = "https://store.example.com/search/?sort_by=Released_DESC"
allowed-domains = ["example.com"]
max-requests = 50
request-timeout = 10

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
records-path = "./records.jl"

[[rules]]
allow = "/app/(.+)/"
region = "#results"
action = "extract"
"##;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.store_url, "https://store.example.com/");
        assert_eq!(config.crawler.max_requests, 50);
        assert_eq!(config.crawler.request_timeout, 10);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.output.records_path, "./records.jl");
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].action, LinkAction::Extract);
    }

    #[test]
    fn test_empty_config_uses_storefront_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(
            config.crawler.start_url,
            "http://store.steampowered.com/search/?sort_by=Released_DESC"
        );
        assert_eq!(config.crawler.allowed_domains, vec!["steampowered.com"]);
        assert_eq!(config.crawler.max_requests, 0);
        assert_eq!(config.output.records_path, "products.jl");
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].action, LinkAction::Extract);
        assert_eq!(config.rules[1].action, LinkAction::Follow);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[crawler]\nmax-requests = 5\n").unwrap();

        assert_eq!(config.crawler.max_requests, 5);
        assert_eq!(config.crawler.request_timeout, 30);
        assert_eq!(config.crawler.store_url, "http://store.steampowered.com/");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/steam.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_rule_action_rejected() {
        let result = parse_config(
            r#"
[[rules]]
allow = "x"
region = "div"
action = "crawl"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let result = parse_config("[crawler]\nrequest-timeout = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
