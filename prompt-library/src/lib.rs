//! Prompt catalog management facade.
//!
//! Bundles the library crates behind feature flags so users can pull in only
//! the pieces they need, for example validation and rendering without the
//! on-disk store.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use library_primitives as primitives;

/// Ingestion, audit, and backfill operations (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use library_kernel as kernel;

/// Library configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use library_config as config;

/// Schema validation (enabled by `schema` feature).
#[cfg(feature = "schema")]
pub use library_schema as schema;

/// Path derivation and document rendering (enabled by `render` feature).
#[cfg(feature = "render")]
pub use library_render as render;

/// Index persistence and artifact storage (enabled by `store` feature).
#[cfg(feature = "store")]
pub use library_store as store;

/// Logging setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use library_telemetry as telemetry;
