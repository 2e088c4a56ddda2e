//! Geocoder abstraction and the Nominatim implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use evkg_geo::{GeoCache, GeocodingConfig, NominatimGeocoder, geocode_cached};
//!
//! let geocoder = NominatimGeocoder::new(&GeocodingConfig::default())?;
//! let mut cache = GeoCache::load("data/geocache.csv");
//! let paris = geocode_cached(&geocoder, "Paris", &mut cache).await;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Deserialize;

use evkg_content::Coordinates;
use evkg_core::{Error, Result};

use crate::{GeoCache, GeocodingConfig};

/// Resolves free-text location names to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up `location`.
    ///
    /// `Ok(None)` means the service answered but found nothing.
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>>;

    /// Geocoder name for diagnostics.
    fn name(&self) -> &str;
}

// ============================================================================
// Nominatim
// ============================================================================

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn coordinates(&self) -> Result<Coordinates> {
        let lat = self
            .lat
            .parse()
            .map_err(|_| Error::parse(format!("invalid latitude '{}'", self.lat)))?;
        let lon = self
            .lon
            .parse()
            .map_err(|_| Error::parse(format!("invalid longitude '{}'", self.lon)))?;
        Ok(Coordinates::new(lat, lon))
    }
}

/// Geocoder backed by the OpenStreetMap Nominatim search API.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
}

impl NominatimGeocoder {
    /// Creates a geocoder with the configured endpoint, User-Agent and timeout.
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::http_with_source("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn search_url(&self, location: &str) -> Result<reqwest::Url> {
        reqwest::Url::parse_with_params(
            &self.endpoint,
            &[("q", location), ("format", "json"), ("limit", "1")],
        )
        .map_err(|e| Error::config(format!("invalid geocoding endpoint '{}': {e}", self.endpoint)))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>> {
        let url = self.search_url(location)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http_with_source(format!("request for '{location}' failed"), e))?;

        if !response.status().is_success() {
            return Err(Error::http(format!(
                "Nominatim rejected '{location}' (HTTP {})",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            Error::http_with_source(format!("response for '{location}' unreadable"), e)
        })?;

        places.first().map(NominatimPlace::coordinates).transpose()
    }

    fn name(&self) -> &str {
        "nominatim"
    }
}

impl std::fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

// ============================================================================
// Mock
// ============================================================================

/// In-memory geocoder for tests and offline runs.
///
/// Known locations resolve, locations marked as failing return an HTTP
/// error, everything else resolves to nothing. Every call is counted.
#[derive(Debug, Default)]
pub struct MockGeocoder {
    places: HashMap<String, Coordinates>,
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    /// Creates a mock that knows no places.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolvable place.
    pub fn with_place(mut self, location: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.places.insert(location.into(), Coordinates::new(lat, lon));
        self
    }

    /// Makes lookups of `location` fail.
    pub fn with_failure(mut self, location: impl Into<String>) -> Self {
        self.failing.push(location.into());
        self
    }

    /// Number of lookups performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, location: &str) -> Result<Option<Coordinates>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|f| f == location) {
            return Err(Error::http(format!("mock failure for '{location}'")));
        }
        Ok(self.places.get(location).copied())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Cached lookup
// ============================================================================

/// Resolves `location` through `cache`, querying `geocoder` on a miss.
///
/// Empty locations resolve to `None` without a lookup. Successful lookups
/// are stored in the cache. Lookup errors are logged and reported as `None`.
pub async fn geocode_cached<G>(geocoder: &G, location: &str, cache: &mut GeoCache) -> Option<Coordinates>
where
    G: Geocoder + ?Sized,
{
    if location.is_empty() {
        return None;
    }
    if let Some(coords) = cache.get(location) {
        return Some(coords);
    }

    match geocoder.geocode(location).await {
        Ok(Some(coords)) => {
            log::debug!("Geocoded '{location}' to ({}, {})", coords.lat, coords.lon);
            cache.insert(location, coords);
            Some(coords)
        }
        Ok(None) => {
            log::debug!("No {} match for '{location}'", geocoder.name());
            None
        }
        Err(e) if e.is_retryable() => {
            log::warn!("Geocoding '{location}' failed, will retry on a later run: {e}");
            None
        }
        Err(e) => {
            log::warn!("Geocoding '{location}' failed: {e}");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_hit_skips_lookup() {
        let geocoder = MockGeocoder::new();
        let mut cache = GeoCache::new();
        cache.insert("Paris", Coordinates::new(48.85, 2.35));

        let coords = geocode_cached(&geocoder, "Paris", &mut cache).await;
        assert_eq!(coords, Some(Coordinates::new(48.85, 2.35)));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_populates_cache() {
        let geocoder = MockGeocoder::new().with_place("Kyiv", 50.45, 30.52);
        let mut cache = GeoCache::new();

        assert!(geocode_cached(&geocoder, "Kyiv", &mut cache).await.is_some());
        assert!(cache.contains("Kyiv"));
        assert!(geocode_cached(&geocoder, "Kyiv", &mut cache).await.is_some());
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_location() {
        let geocoder = MockGeocoder::new();
        let mut cache = GeoCache::new();
        assert!(geocode_cached(&geocoder, "", &mut cache).await.is_none());
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_errors_become_none() {
        let geocoder = MockGeocoder::new().with_failure("Atlantis");
        let mut cache = GeoCache::new();
        assert!(geocode_cached(&geocoder, "Atlantis", &mut cache).await.is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_search_url() {
        let geocoder = NominatimGeocoder::new(&GeocodingConfig::default()).unwrap();
        let url = geocoder.search_url("São Paulo, Brazil").unwrap();
        assert_eq!(url.host_str(), Some("nominatim.openstreetmap.org"));
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("q".into(), "São Paulo, Brazil".into())));
        assert!(query.contains(&("limit".into(), "1".into())));
    }

    #[test]
    fn test_bad_endpoint() {
        let config = GeocodingConfig {
            endpoint: "not a url".into(),
            ..GeocodingConfig::default()
        };
        let geocoder = NominatimGeocoder::new(&config).unwrap();
        assert!(geocoder.search_url("Rome").is_err());
    }

    #[test]
    fn test_place_parsing() {
        let places: Vec<NominatimPlace> =
            serde_json::from_str(r#"[{"lat": "41.89", "lon": "12.49", "display_name": "Roma"}]"#)
                .unwrap();
        assert_eq!(places[0].coordinates().unwrap(), Coordinates::new(41.89, 12.49));

        let bad = NominatimPlace {
            lat: "north".into(),
            lon: "0".into(),
        };
        assert!(bad.coordinates().is_err());
    }
}
