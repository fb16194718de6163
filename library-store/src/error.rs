//! Error types for the storage layer.

use std::path::PathBuf;

use serde_json::Error as SerdeError;
use thiserror::Error;

/// Errors emitted while loading, mutating, or persisting the library.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The index document does not exist.
    #[error("index not found at {}", path.display())]
    NotFound {
        /// Expected location of the index.
        path: PathBuf,
    },
    /// The index document exists but is not a valid index.
    #[error("malformed index at {}: {source}", path.display())]
    Parse {
        /// Location of the index.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: SerdeError,
    },
    /// Underlying I/O failure.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// Serialization error while writing the index.
    #[error("serialization error: {source}")]
    Serialization {
        /// Source [`serde_json::Error`].
        #[from]
        source: SerdeError,
    },
    /// An entry with the same identifier is already indexed.
    #[error("prompt id {id} already exists in the index")]
    DuplicateId {
        /// Conflicting identifier.
        id: String,
    },
    /// Another entry already owns the artifact path.
    #[error("file {file} is already used by {owner}")]
    DuplicateFile {
        /// Conflicting relative path.
        file: String,
        /// Identifier of the entry that owns it.
        owner: String,
    },
    /// The artifact path would escape the library root.
    #[error("invalid artifact path {path:?}: {reason}")]
    InvalidPath {
        /// Offending relative path.
        path: String,
        /// Why the path was refused.
        reason: &'static str,
    },
}

/// Result type alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
