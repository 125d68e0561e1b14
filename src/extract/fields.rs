//! Field normalizers: pure cleanup from raw page text to record values

/// Class prefix shared by every platform icon span
pub const PLATFORM_CLASS_PREFIX: &str = "platform_img ";

/// Trims surrounding whitespace; empty text counts as missing
pub fn clean_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Turns a review count like `"(1,234)"` into `"1234"`
///
/// Parentheses, thousands separators, and whitespace are stripped. Missing
/// input, and anything that is not a plain number once stripped, becomes
/// `"0"`, so the result is always a non-negative digit string.
pub fn clean_count(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "0".to_string();
    };

    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ',') && !c.is_whitespace())
        .collect();

    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        digits
    } else {
        "0".to_string()
    }
}

/// Strips the `platform_img ` class prefix, keeping order
///
/// Entries without the prefix are passed through untouched.
pub fn clean_platforms(classes: &[String]) -> Vec<String> {
    classes
        .iter()
        .map(|class| {
            class
                .strip_prefix(PLATFORM_CLASS_PREFIX)
                .unwrap_or(class)
                .to_string()
        })
        .collect()
}
