//! Cross-checks between the index and the stored artifacts.

use std::collections::{BTreeMap, BTreeSet};

use crate::{ArtifactStore, PromptIndex};

/// An index entry whose artifact is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingArtifact {
    /// Identifier of the entry.
    pub id: String,
    /// Path the entry points at.
    pub file: String,
}

/// Outcome of [`ConsistencyReport::check`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Identifiers whose artifact was found.
    pub existing: BTreeSet<String>,
    /// Entries whose artifact was not found, in index order.
    pub missing: Vec<MissingArtifact>,
}

impl ConsistencyReport {
    /// Checks every index entry against `store`.
    ///
    /// Only the index-to-artifact direction is audited: stray files with no
    /// entry are not reported.
    #[must_use]
    pub fn check(index: &PromptIndex, store: &impl ArtifactStore) -> Self {
        let mut report = Self::default();
        for entry in index.entries() {
            if store.exists(&entry.file) {
                report.existing.insert(entry.id.clone());
            } else {
                report.missing.push(MissingArtifact {
                    id: entry.id.clone(),
                    file: entry.file.clone(),
                });
            }
        }
        report
    }

    /// Returns `true` when no artifact is missing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Identifiers that appear more than once in the index.
#[must_use]
pub fn duplicate_ids(index: &PromptIndex) -> BTreeSet<String> {
    repeated(index.entries().iter().map(|entry| entry.id.as_str()))
}

/// Artifact paths claimed by more than one entry.
#[must_use]
pub fn duplicate_files(index: &PromptIndex) -> BTreeSet<String> {
    repeated(index.entries().iter().map(|entry| entry.file.as_str()))
}

fn repeated<'a>(values: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(value, _)| value.to_owned())
        .collect()
}
