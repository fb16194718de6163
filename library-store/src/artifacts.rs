//! Storage for rendered prompt documents.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use library_config::LibraryConfig;
use tracing::info;

use crate::{StoreError, StoreResult};

/// Read/write access to artifacts addressed by root-relative paths such as
/// `prompts/dev/DEV-001_review.md`.
pub trait ArtifactStore {
    /// Returns `true` if an artifact exists at `relative`.
    fn exists(&self, relative: &str) -> bool;

    /// Writes `contents` to `relative`, replacing any previous artifact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] for paths that leave the root and
    /// [`StoreError::Io`] when the write fails.
    fn write(&self, relative: &str, contents: &str) -> StoreResult<()>;

    /// Reads the artifact at `relative`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] or [`StoreError::Io`].
    fn read(&self, relative: &str) -> StoreResult<String>;
}

/// Artifacts stored as files beneath the library root.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a store rooted at the configured library root.
    #[must_use]
    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(config.root())
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the `/`-separated `relative` path beneath the root.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] for empty paths and for paths with
    /// parent, root, or prefix components.
    pub fn resolve(&self, relative: &str) -> StoreResult<PathBuf> {
        check_relative(relative)?;
        Ok(relative
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment)))
    }
}

impl ArtifactStore for FileArtifactStore {
    fn exists(&self, relative: &str) -> bool {
        self.resolve(relative).is_ok_and(|path| path.is_file())
    }

    fn write(&self, relative: &str, contents: &str) -> StoreResult<()> {
        let path = self.resolve(relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        info!(file = relative, bytes = contents.len(), "wrote artifact");
        Ok(())
    }

    fn read(&self, relative: &str) -> StoreResult<String> {
        Ok(fs::read_to_string(self.resolve(relative)?)?)
    }
}

/// Artifacts held in memory, keyed by relative path.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    files: RefCell<BTreeMap<String, String>>,
}

impl MemoryArtifactStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative paths currently stored, in sorted order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    /// Removes an artifact, returning `true` if it existed.
    pub fn remove(&self, relative: &str) -> bool {
        self.files.borrow_mut().remove(relative).is_some()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn exists(&self, relative: &str) -> bool {
        self.files.borrow().contains_key(relative)
    }

    fn write(&self, relative: &str, contents: &str) -> StoreResult<()> {
        check_relative(relative)?;
        self.files
            .borrow_mut()
            .insert(relative.to_owned(), contents.to_owned());
        Ok(())
    }

    fn read(&self, relative: &str) -> StoreResult<String> {
        check_relative(relative)?;
        self.files.borrow().get(relative).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, relative.to_owned()).into()
        })
    }
}

impl<S: ArtifactStore + ?Sized> ArtifactStore for &S {
    fn exists(&self, relative: &str) -> bool {
        (**self).exists(relative)
    }

    fn write(&self, relative: &str, contents: &str) -> StoreResult<()> {
        (**self).write(relative, contents)
    }

    fn read(&self, relative: &str) -> StoreResult<String> {
        (**self).read(relative)
    }
}

fn check_relative(relative: &str) -> StoreResult<()> {
    let invalid = |reason| StoreError::InvalidPath {
        path: relative.to_owned(),
        reason,
    };
    if relative.is_empty() {
        return Err(invalid("path is empty"));
    }
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("parent components are not allowed")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("path must be relative to the library root"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path());

        store
            .write("prompts/dev/DEV-001_review.md", "# DEV-001: Review\n")
            .unwrap();

        assert!(store.exists("prompts/dev/DEV-001_review.md"));
        assert!(dir.path().join("prompts/dev").is_dir());
        assert_eq!(
            store.read("prompts/dev/DEV-001_review.md").unwrap(),
            "# DEV-001: Review\n"
        );
    }

    #[test]
    fn rejects_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path());

        for path in ["../escape.md", "prompts/../../escape.md", "/etc/passwd", ""] {
            let err = store.write(path, "x").expect_err(path);
            assert!(matches!(err, StoreError::InvalidPath { .. }), "{path}");
            assert!(!store.exists(path));
        }
    }

    #[test]
    fn directories_are_not_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("prompts/dev")).unwrap();
        let store = FileArtifactStore::new(dir.path());
        assert!(!store.exists("prompts/dev"));
        assert!(store.read("prompts/dev/missing.md").is_err());
    }

    #[test]
    fn memory_store_tracks_writes() {
        let store = MemoryArtifactStore::new();
        store.write("prompts/meta/META-001_a.md", "a").unwrap();
        assert!(store.exists("prompts/meta/META-001_a.md"));
        assert_eq!(store.paths(), ["prompts/meta/META-001_a.md"]);

        assert!(store.remove("prompts/meta/META-001_a.md"));
        assert!(store.read("prompts/meta/META-001_a.md").is_err());
        assert!(store.write("../a.md", "a").is_err());
    }
}
