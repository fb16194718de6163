//! Configuration management for the prompt library.
//!
//! A [`LibraryConfig`] is built once and handed to every component that needs
//! to know where the catalog lives or which categories exist. Nothing in the
//! workspace reads paths from globals.

#![warn(missing_docs, clippy::pedantic)]

use std::env;
use std::path::{Component, Path, PathBuf};

use library_primitives::CategoryTable;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the library root directory.
pub const ROOT_ENV_VAR: &str = "PROMPT_LIBRARY_ROOT";

/// Default index document name, relative to the root.
pub const DEFAULT_INDEX_FILE: &str = "PROMPT_INDEX.json";

/// Default directory holding rendered prompt documents, relative to the root.
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";

/// Default minimum prompt body length, in characters.
pub const DEFAULT_MIN_BODY_CHARS: usize = 50;

/// Default category used by interactive ingestion for unknown input.
pub const DEFAULT_FALLBACK_CATEGORY: &str = "meta";

/// Errors raised while assembling a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A path setting was empty or escaped the library root.
    #[error("invalid {setting}: {reason}")]
    InvalidPath {
        /// Name of the offending setting.
        setting: &'static str,
        /// Human-readable reason for rejection.
        reason: String,
    },
    /// The category table was empty or malformed.
    #[error("invalid category table: {0}")]
    Categories(#[from] library_primitives::Error),
    /// Fallback category is not part of the table.
    #[error("fallback category `{0}` is not a configured category")]
    UnknownFallback(String),
    /// The current directory could not be determined.
    #[error("cannot resolve working directory: {0}")]
    WorkingDir(#[from] std::io::Error),
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Immutable settings shared by all library components.
#[derive(Clone, Debug)]
pub struct LibraryConfig {
    root: PathBuf,
    index_file: PathBuf,
    prompts_dir: String,
    categories: CategoryTable,
    min_body_chars: usize,
    fallback_category: String,
}

impl LibraryConfig {
    /// Starts building a configuration rooted at `root`.
    #[must_use]
    pub fn builder(root: impl Into<PathBuf>) -> LibraryConfigBuilder {
        LibraryConfigBuilder::new(root)
    }

    /// Builds the default configuration for `root`.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in defaults; the signature mirrors
    /// [`LibraryConfigBuilder::build`].
    pub fn for_root(root: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::builder(root).build()
    }

    /// Builds the default configuration rooted at `$PROMPT_LIBRARY_ROOT`, or the
    /// current directory when the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkingDir`] when the current directory is not
    /// accessible.
    pub fn from_env() -> ConfigResult<Self> {
        let root = match env::var_os(ROOT_ENV_VAR) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => env::current_dir()?,
        };
        debug!(root = %root.display(), "resolved prompt library root");
        Self::for_root(root)
    }

    /// Library root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (root-joined) path of the index document.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index_file)
    }

    /// Prompts directory name used as the first path segment of every artifact.
    #[must_use]
    pub fn prompts_dir(&self) -> &str {
        &self.prompts_dir
    }

    /// Configured categories.
    #[must_use]
    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Minimum number of characters a prompt body must contain.
    #[must_use]
    pub const fn min_body_chars(&self) -> usize {
        self.min_body_chars
    }

    /// Category substituted for unknown interactive input.
    #[must_use]
    pub fn fallback_category(&self) -> &str {
        &self.fallback_category
    }
}

/// Builder for [`LibraryConfig`].
#[derive(Debug)]
pub struct LibraryConfigBuilder {
    root: PathBuf,
    index_file: PathBuf,
    prompts_dir: String,
    categories: CategoryTable,
    min_body_chars: usize,
    fallback_category: String,
}

impl LibraryConfigBuilder {
    /// Creates a builder with the default settings.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index_file: PathBuf::from(DEFAULT_INDEX_FILE),
            prompts_dir: DEFAULT_PROMPTS_DIR.to_owned(),
            categories: CategoryTable::builtin(),
            min_body_chars: DEFAULT_MIN_BODY_CHARS,
            fallback_category: DEFAULT_FALLBACK_CATEGORY.to_owned(),
        }
    }

    /// Overrides the index file name (relative to the root).
    #[must_use]
    pub fn index_file(mut self, index_file: impl Into<PathBuf>) -> Self {
        self.index_file = index_file.into();
        self
    }

    /// Overrides the prompts directory name.
    #[must_use]
    pub fn prompts_dir(mut self, prompts_dir: impl Into<String>) -> Self {
        self.prompts_dir = prompts_dir.into();
        self
    }

    /// Replaces the category table.
    #[must_use]
    pub fn categories(mut self, categories: CategoryTable) -> Self {
        self.categories = categories;
        self
    }

    /// Overrides the minimum body length.
    #[must_use]
    pub fn min_body_chars(mut self, min_body_chars: usize) -> Self {
        self.min_body_chars = min_body_chars;
        self
    }

    /// Overrides the interactive fallback category.
    #[must_use]
    pub fn fallback_category(mut self, category: impl Into<String>) -> Self {
        self.fallback_category = category.into();
        self
    }

    /// Validates and finalises the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a path is empty or escapes the root, the
    /// category table is empty or holds malformed keys, or the fallback
    /// category is not in the table.
    pub fn build(self) -> ConfigResult<LibraryConfig> {
        validate_relative("index_file", &self.index_file)?;
        if self.prompts_dir.is_empty()
            || self.prompts_dir.contains('/')
            || self.prompts_dir.contains('\\')
            || self.prompts_dir == ".."
        {
            return Err(ConfigError::InvalidPath {
                setting: "prompts_dir",
                reason: "must be a single directory name".into(),
            });
        }

        if self.categories.is_empty() {
            return Err(ConfigError::Categories(
                library_primitives::Error::InvalidCategory {
                    key: String::new(),
                    reason: "at least one category must be configured".into(),
                },
            ));
        }
        // Re-run key validation for tables that were deserialised.
        let mut checked = library_primitives::CategoryTable::new();
        for category in self.categories.iter() {
            checked = checked.with(category.key(), category.label())?;
        }

        if !checked.contains(&self.fallback_category) {
            return Err(ConfigError::UnknownFallback(self.fallback_category));
        }

        Ok(LibraryConfig {
            root: self.root,
            index_file: self.index_file,
            prompts_dir: self.prompts_dir,
            categories: checked,
            min_body_chars: self.min_body_chars,
            fallback_category: self.fallback_category,
        })
    }
}

fn validate_relative(setting: &'static str, path: &Path) -> ConfigResult<()> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidPath {
            setting,
            reason: "path cannot be empty".into(),
        });
    }
    if !path
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(ConfigError::InvalidPath {
            setting,
            reason: format!("`{}` must stay inside the library root", path.display()),
        });
    }
    Ok(())
}
