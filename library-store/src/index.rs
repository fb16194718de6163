//! In-memory form of the catalog index.

use library_primitives::{CategoryTable, IndexEntry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{StoreError, StoreResult};

/// The catalog: an ordered list of entries plus the category table.
///
/// Entries keep their insertion order. A loaded index may contain
/// duplicates introduced by hand edits; [`PromptIndex::append`] refuses to
/// add new ones. Top-level keys other than `prompts` and `categories` are
/// carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptIndex {
    #[serde(default)]
    prompts: Vec<IndexEntry>,
    #[serde(default)]
    categories: CategoryTable,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl PromptIndex {
    /// Creates an empty index carrying `categories`.
    #[must_use]
    pub fn new(categories: CategoryTable) -> Self {
        Self {
            prompts: Vec::new(),
            categories,
            extra: Map::new(),
        }
    }

    /// Returns the entries in index order.
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.prompts
    }

    /// Returns the category table stored alongside the entries.
    #[must_use]
    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Returns `true` if any entry has identifier `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the first entry with identifier `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.prompts.iter().find(|entry| entry.id == id)
    }

    /// Returns the first entry stored at `file`.
    #[must_use]
    pub fn owner_of(&self, file: &str) -> Option<&IndexEntry> {
        self.prompts.iter().find(|entry| entry.file == file)
    }

    /// Appends an entry at the end of the index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if the identifier is taken and
    /// [`StoreError::DuplicateFile`] if another entry owns the same path. The
    /// index is unchanged on error.
    pub fn append(&mut self, entry: IndexEntry) -> StoreResult<()> {
        if self.contains(&entry.id) {
            return Err(StoreError::DuplicateId { id: entry.id });
        }
        if let Some(owner) = self.owner_of(&entry.file) {
            return Err(StoreError::DuplicateFile {
                file: entry.file,
                owner: owner.id.clone(),
            });
        }
        debug!(id = %entry.id, file = %entry.file, "appended index entry");
        self.prompts.push(entry);
        Ok(())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Returns `true` if the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

impl FromIterator<IndexEntry> for PromptIndex {
    /// Collects entries verbatim, duplicates included, with the built-in
    /// category table.
    fn from_iter<I: IntoIterator<Item = IndexEntry>>(iter: I) -> Self {
        Self {
            prompts: iter.into_iter().collect(),
            categories: CategoryTable::builtin(),
            extra: Map::new(),
        }
    }
}
