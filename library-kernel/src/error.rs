//! Error types for library operations.

use std::fmt;
use std::io;

use library_schema::{EntryViolation, ValidationErrors};
use library_store::{AllocationError, MissingArtifact, StoreError};
use thiserror::Error;

/// Failures while ingesting a new prompt.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The raw input was not a JSON object of the expected shape.
    #[error("invalid JSON input: {0}")]
    InvalidJson(#[source] serde_json::Error),
    /// The record broke one or more schema rules.
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
    /// No identifier could be allocated.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    /// Loading, appending, or persisting failed. Includes duplicate ids.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The field supplier failed to produce input.
    #[error("failed to read input: {0}")]
    Input(#[from] io::Error),
}

impl IngestError {
    /// Every problem message carried by the error, one per violation.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Invalid(errors) => errors.messages(),
            other => vec![other.to_string()],
        }
    }
}

/// Failures of operations that only read or extend the store.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Identifier allocation failure.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// One finding of a full audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// An index entry or category breaks a schema rule.
    Schema(EntryViolation),
    /// The identifier is used by more than one entry.
    DuplicateId(String),
    /// The artifact path is claimed by more than one entry.
    DuplicateFile(String),
    /// An entry's artifact does not exist.
    MissingArtifact(MissingArtifact),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(violation) => fmt::Display::fmt(violation, f),
            Self::DuplicateId(id) => write!(f, "duplicate prompt id: {id}"),
            Self::DuplicateFile(file) => write!(f, "file used by more than one prompt: {file}"),
            Self::MissingArtifact(missing) => {
                write!(f, "missing file for {}: {}", missing.id, missing.file)
            }
        }
    }
}

/// Why an audit did not pass.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The index could not be read at all.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The index was read and at least one problem was found.
    #[error("audit found {} problem(s)", .0.len())]
    Problems(Vec<Problem>),
}
