//! Geospatial view for evkg.
//!
//! Location strings from the events are geocoded through the public
//! Nominatim service, memoized in a CSV cache, and drawn as circle markers
//! on a Leaflet map.
//!
//! # Modules
//!
//! - [`types`]: `GeocodingConfig`, `MapConfig`, `ColorMode`
//! - [`cache`]: CSV-backed `GeoCache`
//! - [`geocoder`]: `Geocoder` trait, `NominatimGeocoder`, cached lookup
//! - [`run`]: Rate-limited batch geocoding
//! - [`map`]: Per-location aggregation and map artifacts

pub mod cache;
pub mod geocoder;
pub mod map;
pub mod run;
pub mod types;

// Re-exports - types
pub use types::{ColorMode, GeocodingConfig, MapConfig};

// Re-exports - cache and geocoding
pub use cache::GeoCache;
pub use geocoder::{Geocoder, MockGeocoder, NominatimGeocoder, geocode_cached};
pub use run::{
    GeocodeOptions, GeocodeReport, geocode_new_locations, pending_locations,
    resolved_coordinates,
};

// Re-exports - map
pub use map::{
    LocationMap, LocationSummary, MapArtifacts, MapMarker, aggregate_by_location,
    build_location_map, map_center, marker_radius, sentiment_color, taxonomy_color,
    to_geojson, write_map_artifacts,
};
