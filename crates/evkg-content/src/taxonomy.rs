//! Hierarchical category → label → sentiment mapping.
//!
//! The taxonomy document looks like:
//!
//! ```json
//! {
//!   "Diplomacy": {
//!     "Treaty":      { "sentiment": 3 },
//!     "Negotiation": { "sentiment": 1.5 },
//!     "other":       { "sentiment": 0.5 }
//!   }
//! }
//! ```
//!
//! Labels that are not listed fall back to the category's `other` entry.

use std::collections::BTreeMap;
use std::path::Path;

use evkg_core::{Error, Result};
use serde_json::Value;

/// Fallback label consulted when a label is unknown within its category.
pub const FALLBACK_LABEL: &str = "other";

/// Sentiment lookup table keyed by category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Taxonomy {
    categories: BTreeMap<String, Value>,
}

impl Taxonomy {
    /// Creates an empty taxonomy; every lookup yields 0.0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a taxonomy from a parsed JSON document.
    ///
    /// The top level must be an object; category nodes are kept as-is and
    /// interpreted lazily so malformed categories only affect their own
    /// lookups.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                categories: map.into_iter().collect(),
            }),
            other => Err(Error::parse(format!(
                "Taxonomy must be a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Loads a taxonomy from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let taxonomy = Self::from_value(evkg_core::load_json_value(path)?)?;
        log::info!(
            "Loaded taxonomy with {} categories from {}",
            taxonomy.categories.len(),
            path.display()
        );
        Ok(taxonomy)
    }

    /// Sentiment of `label` within `category`.
    ///
    /// Resolution order: the label's own entry, then the category's
    /// [`FALLBACK_LABEL`] entry, then 0.0. A missing or non-numeric
    /// `sentiment` field counts as 0.0.
    pub fn sentiment(&self, category: &str, label: &str) -> f64 {
        let Some(Value::Object(node)) = self.categories.get(category) else {
            return 0.0;
        };

        if let Some(entry) = node.get(label) {
            return entry_sentiment(entry);
        }

        match node.get(FALLBACK_LABEL) {
            Some(entry) if entry.is_object() => entry_sentiment(entry),
            _ => 0.0,
        }
    }

    /// Category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Labels declared for a category, in document order.
    ///
    /// Returns an empty list for unknown or malformed categories.
    pub fn labels(&self, category: &str) -> Vec<&str> {
        match self.categories.get(category) {
            Some(Value::Object(node)) => node.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` if the taxonomy has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn entry_sentiment(entry: &Value) -> f64 {
    match entry.get("sentiment") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
