//! Shared error definitions for library primitives.

use thiserror::Error;

/// Result alias used throughout the prompt library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing primitive types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The provided prompt identifier does not follow the `PREFIX-NNN` shape.
    #[error("invalid prompt id `{id}`: {reason}")]
    InvalidPromptId {
        /// The offending identifier string.
        id: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Category key or label failed validation.
    #[error("invalid category `{key}`: {reason}")]
    InvalidCategory {
        /// The offending category key.
        key: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Complexity value outside of `low`, `medium`, `high`.
    #[error("invalid complexity `{value}` (expected low, medium, or high)")]
    InvalidComplexity {
        /// The rejected value.
        value: String,
    },
}
