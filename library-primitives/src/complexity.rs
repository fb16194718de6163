//! Prompt complexity classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// How much effort a prompt expects from its user.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Quick, single-step prompts.
    Low,
    /// Multi-step prompts with moderate context.
    #[default]
    Medium,
    /// Long-running or heavily structured prompts.
    High,
}

impl Complexity {
    /// All variants in ascending order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the wire form (`low`, `medium`, `high`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Returns the capitalised form used in rendered documents.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidComplexity {
                value: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_values_only() {
        assert_eq!("high".parse::<Complexity>().unwrap(), Complexity::High);
        assert!("High".parse::<Complexity>().is_err());
        assert!("extreme".parse::<Complexity>().is_err());
    }

    #[test]
    fn label_is_capitalised() {
        assert_eq!(Complexity::Medium.label(), "Medium");
        assert_eq!(Complexity::default(), Complexity::Medium);
    }
}
