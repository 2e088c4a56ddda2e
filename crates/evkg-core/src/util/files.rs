//! File loading and artifact writing.
//!
//! Every failure carries the offending path so CLI error messages point at
//! the file the user needs to fix.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Read a file and deserialize its JSON content into `T`.
///
/// # Example
///
/// ```no_run
/// use evkg_core::load_json;
///
/// let groups: Vec<Vec<serde_json::Value>> = load_json("data/events.json").unwrap();
/// println!("{} groups", groups.len());
/// ```
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::parse(format!("Invalid JSON in {}: {e}", path.display())))
}

/// Read a file as an untyped JSON value.
pub fn load_json_value(path: impl AsRef<Path>) -> Result<serde_json::Value> {
    load_json(path)
}

/// Write an artifact, creating parent directories as needed.
pub fn write_artifact(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
        }
    }
    std::fs::write(path, contents).map_err(|e| Error::io_with_path(e, path))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
