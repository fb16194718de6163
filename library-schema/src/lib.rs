//! Schema validation for prompt records.
//!
//! Callers hand raw, possibly incomplete data to [`SchemaValidator`] as a
//! [`PromptCandidate`]. Validation never stops at the first problem: every
//! rule violation is collected and returned together.

#![warn(missing_docs, clippy::pedantic)]

pub mod candidate;
pub mod validator;
pub mod violation;

pub use candidate::{Mistyped, PromptCandidate, VariantCandidate};
pub use validator::{EntryViolation, SchemaValidator};
pub use violation::{ValidationErrors, Violation};
