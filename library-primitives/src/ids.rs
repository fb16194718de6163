//! Prompt identifier types.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of digits in the zero-padded sequence suffix.
pub const SEQUENCE_WIDTH: usize = 3;

/// Largest sequence number that still fits in [`SEQUENCE_WIDTH`] digits.
pub const MAX_SEQUENCE: u32 = 999;

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+-[0-9]{3}$").expect("prompt id pattern compiles"));

/// Returns `true` when `id` has the canonical `PREFIX-NNN` shape.
#[must_use]
pub fn is_valid_prompt_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

/// Identifier of a prompt, e.g. `DEV-003`.
///
/// The prefix is one or more uppercase ASCII letters and the suffix is a
/// zero-padded three digit sequence number.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptId(String);

impl PromptId {
    /// Creates an identifier after validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPromptId`] if the value is not `PREFIX-NNN`.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if !is_valid_prompt_id(&id) {
            return Err(Error::InvalidPromptId {
                id,
                reason: "expected CATEGORY-NNN".into(),
            });
        }
        Ok(Self(id))
    }

    /// Builds an identifier from a prefix and a sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPromptId`] when the prefix is not uppercase
    /// letters or the sequence does not fit in three digits.
    pub fn compose(prefix: &str, sequence: u32) -> Result<Self> {
        if sequence > MAX_SEQUENCE {
            return Err(Error::InvalidPromptId {
                id: format!("{prefix}-{sequence}"),
                reason: format!("sequence must be <= {MAX_SEQUENCE}"),
            });
        }
        Self::new(format!("{prefix}-{sequence:0width$}", width = SEQUENCE_WIDTH))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PromptId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PromptId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PromptId> for String {
    fn from(value: PromptId) -> Self {
        value.0
    }
}

impl TryFrom<String> for PromptId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for PromptId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_ids() {
        let id: PromptId = "DEV-003".parse().expect("parse");
        assert_eq!(id.as_ref(), "DEV-003");
        assert_eq!(id.to_string(), "DEV-003");
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["dev-001", "DEV-1", "DEV-0001", "DEV001", "-001", "DEV-00a", ""] {
            assert!(PromptId::new(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn compose_pads_to_three_digits() {
        assert_eq!(PromptId::compose("META", 7).unwrap().as_str(), "META-007");
        assert_eq!(PromptId::compose("META", 120).unwrap().as_str(), "META-120");
    }

    #[test]
    fn compose_refuses_four_digit_sequences() {
        let err = PromptId::compose("META", 1000).expect_err("overflow");
        assert!(matches!(err, Error::InvalidPromptId { .. }));
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: PromptId = serde_json::from_str("\"SYS-001\"").unwrap();
        assert_eq!(ok.as_str(), "SYS-001");
        assert!(serde_json::from_str::<PromptId>("\"sys-1\"").is_err());
    }
}
