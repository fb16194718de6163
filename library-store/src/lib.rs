//! Persistence for the prompt library.
//!
//! The catalog lives in a single JSON index handled by [`IndexRepository`];
//! each prompt's rendered document lives behind an [`ArtifactStore`]. The
//! [`allocator`] and [`consistency`] modules operate on a loaded
//! [`PromptIndex`] and never touch the disk themselves.

#![warn(missing_docs, clippy::pedantic)]

pub mod allocator;
pub mod artifacts;
pub mod consistency;
mod error;
pub mod index;
pub mod repository;

pub use allocator::{AllocationError, next_id};
pub use artifacts::{ArtifactStore, FileArtifactStore, MemoryArtifactStore};
pub use consistency::{ConsistencyReport, MissingArtifact, duplicate_files, duplicate_ids};
pub use error::{StoreError, StoreResult};
pub use index::PromptIndex;
pub use repository::IndexRepository;
