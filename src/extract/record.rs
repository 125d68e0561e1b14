use serde::Serialize;

/// One product page, normalized
///
/// Built fresh for every fetched product page and never mutated after it is
/// handed to a sink. Absent optional fields are left out of the serialized
/// form; list fields and counts are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    /// Canonical URL of the page
    pub url: String,

    /// Store identifier from the `/app/<id>/` path segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Most-recent reviews listing, derived from `id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub developer: Vec<String>,
    pub publisher: Vec<String>,

    /// Free text, as shown on the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    pub genres: Vec<String>,
    pub specs: Vec<String>,
    pub tags: Vec<String>,

    /// Listed price, or the pre-discount price when the page shows a discount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Post-discount price; only set when an original price is struck through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<String>,

    /// Review summary labels
    pub sentiment: Vec<String>,

    /// Review counts as digit strings
    pub n_reviews: String,
    pub p_reviews: String,
    pub m_reviews: String,

    pub platform: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metascore: Option<String>,

    pub early_access: bool,
}

impl ProductRecord {
    /// An empty record for `url`, with every field at its default
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: None,
            reviews_url: None,
            title: None,
            developer: Vec::new(),
            publisher: Vec::new(),
            release_date: None,
            genres: Vec::new(),
            specs: Vec::new(),
            tags: Vec::new(),
            price: None,
            discount_price: None,
            sentiment: Vec::new(),
            n_reviews: "0".to_string(),
            p_reviews: "0".to_string(),
            m_reviews: "0".to_string(),
            platform: Vec::new(),
            metascore: None,
            early_access: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = ProductRecord::new("http://store.example.com/app/1/");
        assert_eq!(record.n_reviews, "0");
        assert_eq!(record.p_reviews, "0");
        assert_eq!(record.m_reviews, "0");
        assert!(!record.early_access);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_serialization_omits_absent_optionals() {
        let record = ProductRecord::new("http://store.example.com/search/");
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("id").is_none());
        assert!(json.get("price").is_none());
        assert_eq!(json["n_reviews"], "0");
        assert_eq!(json["early_access"], false);
        assert_eq!(json["genres"], serde_json::json!([]));
    }
}
