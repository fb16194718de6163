//! Core shared types for the prompt library.

#![warn(missing_docs, clippy::pedantic)]

mod category;
mod clock;
mod complexity;
mod error;
mod ids;
mod record;
mod tags;

/// Category keys, display labels, and the ordered lookup table.
pub use category::{Category, CategoryTable, is_valid_category_key};
/// Date sources used to stamp records at ingestion time.
pub use clock::{Clock, FixedClock, SystemClock};
/// Relative effort classification of a prompt.
pub use complexity::Complexity;
/// Error type and result alias shared across the library.
pub use error::{Error, Result};
/// Identifier assigned to every prompt in the catalog.
pub use ids::{MAX_SEQUENCE, PromptId, SEQUENCE_WIDTH, is_valid_prompt_id};
/// Validated prompt records and catalog entries.
pub use record::{IndexEntry, PromptRecord, Variant, parse_date};
/// Tag format checks and normalisation.
pub use tags::{is_valid_tag, normalize_tag, split_tags};
