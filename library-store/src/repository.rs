//! Loading and crash-safe saving of the index document.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use library_config::LibraryConfig;
use library_primitives::CategoryTable;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{PromptIndex, StoreError, StoreResult};

/// Reads and writes the JSON index at a fixed location.
#[derive(Debug, Clone)]
pub struct IndexRepository {
    path: PathBuf,
    categories: CategoryTable,
}

impl IndexRepository {
    /// Creates a repository for the index configured in `config`.
    #[must_use]
    pub fn new(config: &LibraryConfig) -> Self {
        Self::at(config.index_path(), config.categories().clone())
    }

    /// Creates a repository for an explicit index path. `categories` seeds
    /// the table written by [`IndexRepository::init`].
    #[must_use]
    pub fn at(path: impl Into<PathBuf>, categories: CategoryTable) -> Self {
        Self {
            path: path.into(),
            categories,
        }
    }

    /// Location of the index document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document is absent,
    /// [`StoreError::Parse`] if it is not a valid index, and
    /// [`StoreError::Io`] for any other read failure.
    pub fn load(&self) -> StoreResult<PromptIndex> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        let index: PromptIndex =
            serde_json::from_str(&text).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), entries = index.len(), "loaded index");
        Ok(index)
    }

    /// Persists the index as pretty-printed JSON.
    ///
    /// The document is written to a uniquely named sibling, flushed to disk,
    /// and renamed over the index, so readers see either the old or the new
    /// document in full.
    ///
    /// Once the rename succeeds the new document is in place, so a failure to
    /// sync the directory afterwards is logged rather than returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] or [`StoreError::Io`]. A failed
    /// save leaves the previous index in place and removes its temp file.
    pub fn save(&self, index: &PromptIndex) -> StoreResult<()> {
        let mut bytes = serde_json::to_vec_pretty(index)?;
        bytes.push(b'\n');

        let dir = self.dir();
        fs::create_dir_all(dir)?;
        let tmp = dir.join(format!(".{}.{}.tmp", self.file_name(), Uuid::new_v4()));

        let replaced = write_and_sync(&tmp, &bytes)
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(StoreError::from));
        if let Err(err) = replaced {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
        if let Err(err) = sync_dir(dir) {
            warn!(
                dir = %dir.display(),
                error = %err,
                "index renamed but directory sync failed"
            );
        }

        info!(path = %self.path.display(), entries = index.len(), "saved index");
        Ok(())
    }

    /// Writes an empty index if none exists. Returns `true` when a new
    /// document was created.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`IndexRepository::save`].
    pub fn init(&self) -> StoreResult<bool> {
        if self.path.exists() {
            debug!(path = %self.path.display(), "index already present");
            return Ok(false);
        }
        self.save(&PromptIndex::new(self.categories.clone()))?;
        Ok(true)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| "index".to_owned(), |name| name.to_string_lossy().into_owned())
    }
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

fn sync_dir(dir: &Path) -> StoreResult<()> {
    let handle = OpenOptions::new().read(true).open(dir)?;
    handle.sync_all()?;
    Ok(())
}
