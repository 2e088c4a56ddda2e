//! evkg Core: shared error type and file utilities.
//!
//! This crate provides the foundational pieces used across all evkg crates.
//! It has no internal evkg dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`util`]: JSON loading, artifact writing, and HTML escaping

pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};

// Convenience re-exports from util
pub use util::files::{load_json, load_json_value, write_artifact};
pub use util::html::{escape_html, script_json};
