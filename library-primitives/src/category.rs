//! Category keys and their display labels.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const MAX_KEY_LEN: usize = 32;

const DEFAULT_CATEGORIES: [(&str, &str); 6] = [
    ("dev", "Development & Code"),
    ("docs", "Documentation"),
    ("review", "Review & Audit"),
    ("system", "System & Infrastructure"),
    ("extraction", "Extraction & Analysis"),
    ("meta", "Meta & Orchestration"),
];

/// Returns `true` when `key` is usable as a category key.
///
/// Keys are lowercase ASCII letters only so that the uppercased key is a
/// valid identifier prefix.
#[must_use]
pub fn is_valid_category_key(key: &str) -> bool {
    !key.is_empty() && key.len() <= MAX_KEY_LEN && key.chars().all(|c| c.is_ascii_lowercase())
}

/// A single category: storage key plus human-facing label.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Category {
    key: String,
    label: String,
}

impl Category {
    /// Returns the category key, e.g. `dev`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the display label, e.g. `Development & Code`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Ordered mapping of category key to display label.
///
/// Serialises as a JSON object and keeps document order on the way back in.
/// Deserialisation does not validate keys, so hand-edited tables can still
/// be loaded and audited.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CategoryTable {
    entries: Vec<Category>,
}

impl CategoryTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the built-in table of six categories.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: DEFAULT_CATEGORIES
                .iter()
                .map(|(key, label)| Category {
                    key: (*key).to_owned(),
                    label: (*label).to_owned(),
                })
                .collect(),
        }
    }

    /// Adds or relabels a category after validating the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCategory`] if the key is not lowercase letters
    /// or the label is empty.
    pub fn with(mut self, key: impl Into<String>, label: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let label = label.into();
        if !is_valid_category_key(&key) {
            return Err(Error::InvalidCategory {
                key,
                reason: format!("key must be 1..={MAX_KEY_LEN} lowercase ASCII letters"),
            });
        }
        if label.trim().is_empty() {
            return Err(Error::InvalidCategory {
                key,
                reason: "label cannot be empty".into(),
            });
        }
        self.upsert(key, label);
        Ok(self)
    }

    fn upsert(&mut self, key: String, label: String) {
        if let Some(existing) = self.entries.iter_mut().find(|c| c.key == key) {
            existing.label = label;
        } else {
            self.entries.push(Category { key, label });
        }
    }

    /// Looks up a category by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Category> {
        self.entries.iter().find(|c| c.key == key)
    }

    /// Returns `true` when the key is part of the table.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the display label for `key`, if known.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(Category::label)
    }

    /// Returns the display label for `key`, falling back to the key itself.
    #[must_use]
    pub fn display_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.label(key).unwrap_or(key)
    }

    /// Reverse lookup from a display label to its key.
    #[must_use]
    pub fn key_for_label(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|c| c.label == label)
            .map(Category::key)
    }

    /// Iterates over the keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Category::key)
    }

    /// Iterates over the categories in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no categories are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CategoryTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for category in &self.entries {
            map.serialize_entry(&category.key, &category.label)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = CategoryTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category key to display label")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut table = CategoryTable::new();
                while let Some((key, label)) = access.next_entry::<String, String>()? {
                    table.upsert(key, label);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_six_categories() {
        let table = CategoryTable::builtin();
        assert_eq!(table.len(), 6);
        assert_eq!(table.label("system"), Some("System & Infrastructure"));
        assert_eq!(table.key_for_label("Review & Audit"), Some("review"));
        assert_eq!(table.get("dev").unwrap().label(), "Development & Code");
    }

    #[test]
    fn display_label_falls_back_to_key() {
        let table = CategoryTable::builtin();
        assert_eq!(table.display_label("unknown"), "unknown");
    }

    #[test]
    fn with_rejects_bad_keys() {
        let err = CategoryTable::new()
            .with("Dev-Ops", "Ops")
            .expect_err("uppercase and hyphen rejected");
        assert!(matches!(err, Error::InvalidCategory { .. }));

        let err = CategoryTable::new()
            .with("ops", "  ")
            .expect_err("empty label rejected");
        assert!(matches!(err, Error::InvalidCategory { .. }));
    }

    #[test]
    fn json_keeps_document_order() {
        let json = r#"{"zeta":"Z","alpha":"A","mid":"M"}"#;
        let table: CategoryTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
        assert_eq!(serde_json::to_string(&table).unwrap(), json);
    }
}
