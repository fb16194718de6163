//! Field-by-field input for interactive ingestion.

use std::fmt;
use std::io;

use library_primitives::{CategoryTable, Complexity, split_tags};
use library_schema::PromptCandidate;
use tracing::warn;

/// A value requested from the user during interactive ingestion, in the
/// order it is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Category key.
    Category,
    /// Identifier; defaults to the next free one in the category.
    Id,
    /// Display name.
    Name,
    /// One-line purpose.
    Description,
    /// Comma-separated tags.
    Tags,
    /// `low`, `medium`, or `high`.
    Complexity,
    /// Optional usage guidance.
    WhenToUse,
    /// Optional attribution.
    Source,
    /// Prompt text, possibly spanning many lines.
    Body,
}

impl Field {
    /// Every field in prompting order.
    pub const ALL: [Self; 9] = [
        Self::Category,
        Self::Id,
        Self::Name,
        Self::Description,
        Self::Tags,
        Self::Complexity,
        Self::WhenToUse,
        Self::Source,
        Self::Body,
    ];

    /// Human-readable label for prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Id => "Prompt ID",
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Tags => "Tags (comma-separated)",
            Self::Complexity => "Complexity (low/medium/high)",
            Self::WhenToUse => "When to use (optional)",
            Self::Source => "Source (optional)",
            Self::Body => "Prompt text",
        }
    }

    /// Returns `true` for fields that may span several lines.
    #[must_use]
    pub const fn is_multiline(self) -> bool {
        matches!(self, Self::Body)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of answers for interactive ingestion, usually a console.
pub trait FieldSupplier {
    /// Returns the raw answer for `field`. `default` is shown to the user
    /// and applied when the answer is blank.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading input.
    fn supply_field(&mut self, field: Field, default: Option<&str>) -> io::Result<String>;
}

impl<S: FieldSupplier + ?Sized> FieldSupplier for &mut S {
    fn supply_field(&mut self, field: Field, default: Option<&str>) -> io::Result<String> {
        (**self).supply_field(field, default)
    }
}

/// Asks for `field`, trimming the answer and falling back to `default` when
/// it is blank.
pub(crate) fn ask(
    supplier: &mut impl FieldSupplier,
    field: Field,
    default: Option<&str>,
) -> io::Result<Option<String>> {
    let answer = supplier.supply_field(field, default)?;
    let answer = if field.is_multiline() {
        answer.trim_matches('\n').to_owned()
    } else {
        answer.trim().to_owned()
    };
    if answer.is_empty() {
        Ok(default.map(str::to_owned))
    } else {
        Ok(Some(answer))
    }
}

/// Lowercases the answer and replaces unknown categories with `fallback`.
pub(crate) fn resolve_category(
    answer: Option<String>,
    categories: &CategoryTable,
    fallback: &str,
) -> String {
    let category = answer.map(|value| value.to_lowercase()).unwrap_or_default();
    if categories.contains(&category) {
        category
    } else {
        warn!(%category, %fallback, "unknown category, using fallback");
        fallback.to_owned()
    }
}

/// Asks for every field after `Category` and `Id` and fills the candidate.
pub(crate) fn collect_fields(
    supplier: &mut impl FieldSupplier,
    candidate: PromptCandidate,
) -> io::Result<PromptCandidate> {
    let name = ask(supplier, Field::Name, None)?;
    let description = ask(supplier, Field::Description, None)?;
    let tags = ask(supplier, Field::Tags, None)?
        .map(|raw| split_tags(&raw))
        .unwrap_or_default();
    let complexity = ask(supplier, Field::Complexity, Some(Complexity::default().as_str()))?
        .map(|value| value.to_lowercase());
    let when_to_use = ask(supplier, Field::WhenToUse, None)?;
    let source = ask(supplier, Field::Source, None)?;
    let body = ask(supplier, Field::Body, None)?;

    Ok(PromptCandidate {
        name,
        description,
        tags: Some(tags),
        complexity,
        when_to_use,
        source,
        body,
        ..candidate
    })
}
