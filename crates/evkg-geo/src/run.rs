//! Batch geocoding of new locations.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{GeoCache, Geocoder, GeocodingConfig, geocode_cached};

/// Limits for one geocoding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeocodeOptions {
    /// Maximum number of uncached locations to look up.
    pub max_new: usize,
    /// Pause after every lookup.
    pub delay: Duration,
}

impl Default for GeocodeOptions {
    fn default() -> Self {
        Self::from(&GeocodingConfig::default())
    }
}

impl From<&GeocodingConfig> for GeocodeOptions {
    fn from(config: &GeocodingConfig) -> Self {
        Self {
            max_new: config.max_new,
            delay: config.delay(),
        }
    }
}

/// Outcome of a geocoding run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeReport {
    /// Lookups performed.
    pub attempted: usize,
    /// Lookups that produced coordinates.
    pub resolved: usize,
    /// Lookups that produced nothing or failed.
    pub failed: usize,
}

/// Sorted unique non-empty locations missing from `cache`.
pub fn pending_locations<'a, I>(locations: I, cache: &GeoCache) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    locations
        .into_iter()
        .filter(|loc| !loc.is_empty() && !cache.contains(loc))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Geocodes up to `options.max_new` uncached locations, in sorted order.
///
/// Lookups run one at a time with `options.delay` after each, as the public
/// Nominatim service allows at most one request per second. The cache is
/// updated in place; persisting it is up to the caller.
pub async fn geocode_new_locations<'a, G, I>(
    geocoder: &G,
    locations: I,
    cache: &mut GeoCache,
    options: GeocodeOptions,
) -> GeocodeReport
where
    G: Geocoder + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let pending = pending_locations(locations, cache);
    let batch = &pending[..pending.len().min(options.max_new)];
    let mut report = GeocodeReport::default();

    if batch.is_empty() {
        log::info!("No new locations to geocode");
        return report;
    }

    log::info!(
        "Geocoding {} of {} new locations with {}",
        batch.len(),
        pending.len(),
        geocoder.name()
    );

    for location in batch {
        report.attempted += 1;
        if geocode_cached(geocoder, location, cache).await.is_some() {
            report.resolved += 1;
        } else {
            report.failed += 1;
        }
        if !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    log::info!(
        "Geocoding finished: {} resolved, {} failed",
        report.resolved,
        report.failed
    );
    report
}

/// `(location, lat, lon)` for every location already in `cache`.
///
/// Locations are de-duplicated and returned in sorted order.
pub fn resolved_coordinates<'a, I>(locations: I, cache: &GeoCache) -> Vec<(String, f64, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    locations
        .into_iter()
        .filter(|loc| !loc.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter_map(|loc| cache.get(loc).map(|c| (loc.to_string(), c.lat, c.lon)))
        .collect()
}
