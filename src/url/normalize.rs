use crate::UrlError;
use url::Url;

/// Query parameters that only carry click-tracking state
const TRACKING_PARAMS: &[&str] = &["snr"];

/// Canonicalizes a URL so that equal pages compare equal
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed or not HTTP(S)
/// 2. Lowercase the host (default ports are dropped by the parser)
/// 3. Normalize percent-encoding in the path:
///    - Decode escapes of unreserved characters (`%7E` -> `~`)
///    - Uppercase the hex digits of every remaining escape
/// 4. Remove fragment (everything after #)
/// 5. Remove tracking query parameters
/// 6. Sort remaining query parameters by key, then value
/// 7. Remove empty query string (trailing ?)
///
/// The scheme and any trailing slash are kept: `/app/570/` and `/app/570`
/// are different store URLs. Canonicalizing a canonical URL is a no-op.
///
/// # Examples
///
/// ```
/// use steam_products::url::canonicalize_url;
///
/// let url = canonicalize_url("http://Store.SteamPowered.com/app/570/?snr=1_7_7&l=english").unwrap();
/// assert_eq!(url.as_str(), "http://store.steampowered.com/app/570/?l=english");
/// ```
pub fn canonicalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or(UrlError::MissingDomain)?;
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Parse(format!("Failed to set host: {}", e)))?;

    let path = normalize_percent_encoding(url.path());
    url.set_path(&path);

    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    Ok(url)
}

/// Decodes needlessly escaped unreserved characters and uppercases the rest
///
/// A '%' that does not start a valid escape is itself escaped as `%25`.
fn normalize_percent_encoding(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut normalized = String::with_capacity(path.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                let decoded = hi * 16 + lo;
                if is_unreserved(decoded) {
                    normalized.push(decoded as char);
                } else {
                    normalized.push('%');
                    normalized.push((bytes[i + 1] as char).to_ascii_uppercase());
                    normalized.push((bytes[i + 2] as char).to_ascii_uppercase());
                }
                i += 3;
                continue;
            }
        }

        if bytes[i] == b'%' {
            // A stray '%' would pair with later digits on the next pass
            normalized.push_str("%25");
        } else {
            normalized.push(bytes[i] as char);
        }
        i += 1;
    }

    normalized
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// RFC 3986 unreserved characters
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort();

    params
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key)
}
