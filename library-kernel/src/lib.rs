//! Boundary operations of the prompt library.
//!
//! [`Library`] is the entry point for collaborators such as the CLI: it
//! ingests prompts from JSON or field by field, audits the catalog against
//! the stored artifacts, backfills missing artifacts, and suggests
//! identifiers. Each operation runs to completion synchronously; there is no
//! locking, so concurrent writers against one index race and the last save
//! wins.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod interactive;
mod library;

pub use error::{AuditError, IngestError, LibraryError, Problem};
pub use interactive::{Field, FieldSupplier};
pub use library::{AuditReport, AuditSummary, BackfillOutcome, Ingested, Library};
