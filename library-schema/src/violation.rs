//! Rule violations reported by the validator.

use std::fmt;

use thiserror::Error;

/// A single rule failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// A required field was absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// Identifier does not follow `PREFIX-NNN`.
    #[error("invalid id format: {0} (expected CATEGORY-NNN)")]
    InvalidId(String),
    /// Category key is not in the configured table.
    #[error("invalid category: {category} (valid: {valid})")]
    UnknownCategory {
        /// The rejected key.
        category: String,
        /// Comma-separated list of accepted keys.
        valid: String,
    },
    /// Complexity outside `low`, `medium`, `high`.
    #[error("invalid complexity: {0} (expected low, medium, or high)")]
    InvalidComplexity(String),
    /// Tag does not match `[a-z][a-z0-9-]*`.
    #[error("invalid tag format: {0} (use lowercase, hyphenated)")]
    InvalidTag(String),
    /// Prompt body below the configured minimum.
    #[error("prompt text too short: {length} characters (minimum {minimum})")]
    BodyTooShort {
        /// Observed length in characters.
        length: usize,
        /// Configured minimum.
        minimum: usize,
    },
    /// A variant lacks a required field.
    #[error("variant {index} is missing required field: {field}")]
    VariantMissingField {
        /// Zero-based position of the variant.
        index: usize,
        /// Name of the absent field.
        field: &'static str,
    },
    /// An index entry's file does not follow the derived layout.
    #[error("file {file} does not match {expected}<slug>.md")]
    MisplacedFile {
        /// Path stored in the index.
        file: String,
        /// Required path prefix.
        expected: String,
    },
    /// A field holds a JSON value of the wrong type.
    #[error("wrong type for field {field}: expected {expected}")]
    WrongType {
        /// Field path, e.g. `tags` or `variants[0].prompt`.
        field: String,
        /// Description of the accepted type.
        expected: &'static str,
    },
    /// A field rendered into the metadata block spans several lines.
    #[error("{0} must be a single line")]
    LineBreak(&'static str),
    /// A stored date is not `YYYY-MM-DD`.
    #[error("invalid {field} date: {value} (expected YYYY-MM-DD)")]
    InvalidDate {
        /// `created` or `updated`.
        field: &'static str,
        /// The stored text.
        value: String,
    },
    /// The index `categories` table holds a malformed key or empty label.
    #[error("invalid category table entry: {0}")]
    InvalidCategoryEntry(String),
}

/// Non-empty collection of violations for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// Wraps a list of violations.
    #[must_use]
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the individual violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Renders every violation as a message, in detection order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` when no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `true` if any violation equals `violation`.
    #[must_use]
    pub fn contains(&self, violation: &Violation) -> bool {
        self.violations.contains(violation)
    }
}

impl From<Violation> for ValidationErrors {
    fn from(value: Violation) -> Self {
        Self::new(vec![value])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
