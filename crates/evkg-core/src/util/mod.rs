//! Utility modules for file handling and text helpers.
//!
//! # Modules
//!
//! - [`files`]: JSON loading and artifact writing
//! - [`html`]: Escaping for text and JSON embedded in HTML artifacts

pub mod files;
pub mod html;
