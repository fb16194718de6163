//! Tag format rules.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("tag pattern compiles"));

/// Returns `true` for lowercase, hyphenated tags starting with a letter.
#[must_use]
pub fn is_valid_tag(tag: &str) -> bool {
    TAG_PATTERN.is_match(tag)
}

/// Normalises free-form input into tag shape: trimmed, lowercased, inner
/// whitespace turned into hyphens.
///
/// The result is not guaranteed to be valid; run [`is_valid_tag`] on it.
#[must_use]
pub fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Splits a comma-separated list into normalised tags, dropping empties.
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_tag)
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_pattern() {
        assert!(is_valid_tag("code-review"));
        assert!(is_valid_tag("k8s"));
        assert!(!is_valid_tag("9lives"));
        assert!(!is_valid_tag("-lead"));
        assert!(!is_valid_tag("Upper"));
        assert!(!is_valid_tag("snake_case"));
        assert!(!is_valid_tag(""));
    }

    #[test]
    fn split_normalises_and_drops_empties() {
        assert_eq!(
            split_tags(" Code Review, ops ,, Health Check "),
            ["code-review", "ops", "health-check"]
        );
    }
}
