//! Logging setup for prompt library binaries.
//!
//! Library crates only emit `tracing` events; a binary calls [`init`] once
//! to print them. `RUST_LOG` takes precedence over the verbosity count.

#![warn(missing_docs, clippy::pedantic)]

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {reason}")]
    Install {
        /// Reason reported by `tracing-subscriber`.
        reason: String,
    },
}

/// Maps a `-v` count to the most verbose level shown.
///
/// Zero shows warnings and errors only.
#[must_use]
pub const fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Builds the filter: `RUST_LOG` when set and valid, otherwise
/// [`level_for`] applied to every target.
#[must_use]
pub fn filter_for(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity).as_str().to_lowercase()))
}

/// Installs a formatted subscriber writing to stderr, so stdout stays free
/// for command output.
///
/// # Errors
///
/// Returns [`TelemetryError::Install`] if a global subscriber is already set.
pub fn init(verbosity: u8) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| TelemetryError::Install {
            reason: err.to_string(),
        })
}
