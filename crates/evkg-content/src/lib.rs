//! Event loading and the unified event table.
//!
//! This crate turns the two raw inputs (a taxonomy JSON document and a
//! grouped events JSON document) into a flat [`EventTable`] that every view
//! consumes. It knows nothing about graphs, maps or charts.
//!
//! # Modules
//!
//! - [`taxonomy`]: category → label → sentiment lookup
//! - [`event`]: raw event records as found in the source JSON
//! - [`period`]: month/week bucketing
//! - [`table`]: the unified, cleaned table with derived columns
//! - [`filter`]: row predicates used by every view
//!
//! # Example
//!
//! ```rust
//! use evkg_content::{EventTable, Taxonomy};
//! use serde_json::json;
//!
//! let taxonomy = Taxonomy::from_value(json!({
//!     "Diplomacy": { "Treaty": { "sentiment": 3 } }
//! })).unwrap();
//!
//! let events = json!([[{
//!     "event_title": "Peace accord signed",
//!     "event_location": "Geneva",
//!     "event_date_occured": { "kind": "single", "date": "14/03/2024" },
//!     "entities": [{ "name": "UN", "tag": "ORG" }],
//!     "event_classifications": { "Diplomacy": ["Treaty"] }
//! }]]);
//!
//! let table = EventTable::from_json(events, &taxonomy).unwrap();
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.records()[0].sentiment, 3.0);
//! ```

pub mod event;
pub mod filter;
pub mod period;
pub mod table;
pub mod taxonomy;

// Re-export commonly used types
pub use event::{Entity, EventDate, RawEvent, flatten_events};
pub use filter::EventFilter;
pub use period::Granularity;
pub use table::{BuildStats, Coordinates, EventRecord, EventTable};
pub use taxonomy::Taxonomy;
