//! Validated prompt records and their catalog projection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Complexity, PromptId};

/// Alternate phrasing of a prompt, rendered as a nested section.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Section title.
    pub name: String,
    /// Optional explanation shown above the variant body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Variant prompt text.
    #[serde(rename = "prompt")]
    pub body: String,
}

/// A prompt that passed schema validation.
///
/// Only the schema validator produces these, so every required field is
/// guaranteed to be present and well formed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Unique identifier.
    pub id: PromptId,
    /// Human-readable name.
    pub name: String,
    /// Category key known to the configured table.
    pub category: String,
    /// One-line purpose statement.
    pub description: String,
    /// Lowercase, hyphenated tags in authoring order.
    pub tags: Vec<String>,
    /// Effort classification.
    pub complexity: Complexity,
    /// Prompt text.
    #[serde(rename = "prompt")]
    pub body: String,
    /// Attribution for the prompt's origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Guidance on when to reach for the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_to_use: Option<String>,
    /// Description of what a good answer looks like.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    /// Alternate phrasings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Variant>,
    /// Date of first ingestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<NaiveDate>,
    /// Date of the latest ingestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<NaiveDate>,
}

impl PromptRecord {
    /// Applies ingestion timestamps: `created` is kept if already set,
    /// `updated` always becomes `today`.
    pub fn stamp(&mut self, today: NaiveDate) {
        self.created.get_or_insert(today);
        self.updated = Some(today);
    }

    /// Projects the record into its catalog entry stored at `file`.
    #[must_use]
    pub fn index_entry(&self, file: impl Into<String>) -> IndexEntry {
        IndexEntry {
            id: self.id.to_string(),
            name: self.name.clone(),
            category: self.category.clone(),
            file: file.into(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            complexity: self.complexity.as_str().to_owned(),
            source: self.source.clone(),
            created: self.created.map(|date| date.to_string()),
            updated: self.updated.map(|date| date.to_string()),
            extra: Map::new(),
        }
    }
}

/// Minimal projection of a prompt stored in the catalog index.
///
/// Fields stay string-typed and default to empty so that a hand-edited index
/// still loads; the schema audit reports what is wrong with it. Keys this
/// type does not know are kept in [`IndexEntry::extra`] and written back
/// unchanged.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Prompt identifier.
    #[serde(default)]
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Category key.
    #[serde(default)]
    pub category: String,
    /// Artifact path relative to the library root.
    #[serde(default)]
    pub file: String,
    /// One-line purpose statement.
    #[serde(default)]
    pub description: String,
    /// Tags in authoring order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Complexity wire value.
    #[serde(default)]
    pub complexity: String,
    /// Attribution for the prompt's origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Date of first ingestion, `YYYY-MM-DD` when well formed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Date of the latest ingestion, `YYYY-MM-DD` when well formed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Unrecognised keys, preserved across load and save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IndexEntry {
    /// Parses `created`, or `None` when absent or malformed.
    #[must_use]
    pub fn created_date(&self) -> Option<NaiveDate> {
        parse_date(self.created.as_deref())
    }

    /// Parses `updated`, or `None` when absent or malformed.
    #[must_use]
    pub fn updated_date(&self) -> Option<NaiveDate> {
        parse_date(self.updated.as_deref())
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
#[must_use]
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PromptRecord {
        PromptRecord {
            id: PromptId::new("DEV-001").unwrap(),
            name: "Review".into(),
            category: "dev".into(),
            description: "Review code".into(),
            tags: vec!["review".into()],
            complexity: Complexity::Low,
            body: "x".repeat(60),
            source: Some("handbook".into()),
            when_to_use: None,
            expected_output: None,
            variants: Vec::new(),
            created: None,
            updated: None,
        }
    }

    #[test]
    fn stamp_keeps_created() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        let mut rec = record();
        rec.stamp(first);
        assert_eq!(rec.created, Some(first));
        assert_eq!(rec.updated, Some(first));

        rec.stamp(later);
        assert_eq!(rec.created, Some(first));
        assert_eq!(rec.updated, Some(later));
    }

    #[test]
    fn index_entry_omits_absent_source() {
        let mut rec = record();
        rec.source = None;
        let json = serde_json::to_value(rec.index_entry("prompts/dev/DEV-001_review.md")).unwrap();
        assert!(json.get("source").is_none());
        assert_eq!(json["complexity"], "low");
        assert_eq!(json["file"], "prompts/dev/DEV-001_review.md");
    }

    #[test]
    fn lenient_entry_loads_with_missing_fields() {
        let entry: IndexEntry = serde_json::from_str(r#"{"id":"DEV-001"}"#).unwrap();
        assert_eq!(entry.id, "DEV-001");
        assert!(entry.name.is_empty());
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn malformed_dates_still_load() {
        let entry: IndexEntry =
            serde_json::from_str(r#"{"id":"DEV-001","created":"2025-01","updated":"2025-02-03"}"#)
                .unwrap();
        assert_eq!(entry.created.as_deref(), Some("2025-01"));
        assert_eq!(entry.created_date(), None);
        assert_eq!(entry.updated_date(), NaiveDate::from_ymd_opt(2025, 2, 3));
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let json = r#"{"id":"DEV-001","related":["DEV-002"],"owner":"ops"}"#;
        let entry: IndexEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.extra["related"], serde_json::json!(["DEV-002"]));

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["owner"], "ops");
        assert_eq!(back["related"][0], "DEV-002");
    }

    #[test]
    fn index_entry_writes_iso_dates() {
        let mut rec = record();
        rec.stamp(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        let entry = rec.index_entry("prompts/dev/DEV-001_review.md");
        assert_eq!(entry.created.as_deref(), Some("2024-01-02"));
        assert_eq!(entry.created_date(), rec.created);
    }
}
