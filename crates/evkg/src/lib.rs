//! One dependency for the whole event pipeline.
//!
//! [`content`] turns the events and taxonomy documents into an
//! [`EventTable`](content::EventTable); the view modules read that table.
//! `graph` links entities that share events, `geo` geocodes locations and
//! places them on a map, and `timeline` charts events per month or week.
//! Each view sits behind a feature of the same name, all on by default.

#![doc = include_str!("../README.md")]

pub use evkg_content as content;
pub use evkg_core as core;

#[cfg(feature = "graph")]
pub use evkg_graph as graph;

#[cfg(feature = "geo")]
pub use evkg_geo as geo;

#[cfg(feature = "timeline")]
pub use evkg_timeline as timeline;

/// The table, its filter, and the artifact writer of each enabled view.
pub mod prelude {
    pub use evkg_content::{EventFilter, EventTable, Granularity, Taxonomy};
    pub use evkg_core::{Error, Result};

    #[cfg(feature = "graph")]
    pub use evkg_graph::{GraphBuilder, GraphConfig, top_centralities, write_graph_artifacts};

    #[cfg(feature = "geo")]
    pub use evkg_geo::{
        GeoCache, Geocoder, MapConfig, NominatimGeocoder, build_location_map,
        geocode_new_locations, write_map_artifacts,
    };

    #[cfg(feature = "timeline")]
    pub use evkg_timeline::{TimelineConfig, write_timeline_artifacts};
}
