//! Artifact paths and Markdown documents for prompt records.
//!
//! [`derive_path`] maps a record to its location under the prompts
//! directory and [`DocumentRenderer`] produces the file written there.
//! Placeholder documents stand in for catalog entries whose artifact has
//! gone missing.

#![warn(missing_docs, clippy::pedantic)]

pub mod document;
pub mod path;
pub mod template;

pub use document::{DocumentRenderer, RenderedMetadata, parse_metadata};
pub use path::{derive_path, derive_path_in, slugify};
pub use template::Template;
