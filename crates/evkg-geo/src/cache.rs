//! Persistent location → coordinates cache.
//!
//! Stored as CSV with header `location,lat,lon`. Loading never fails: a
//! missing or malformed file simply starts an empty cache.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};

use evkg_content::Coordinates;
use evkg_core::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
struct CacheRow {
    location: String,
    lat: f64,
    lon: f64,
}

/// Cache of geocoded locations, ordered by location name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoCache {
    entries: BTreeMap<String, Coordinates>,
}

impl GeoCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a cache file, falling back to an empty cache on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No geocache at {}, starting empty", path.display());
            return Self::new();
        }

        match Self::read(path) {
            Ok(cache) => {
                log::info!("Loaded {} cached locations from {}", cache.len(), path.display());
                cache
            }
            Err(e) => {
                log::warn!("Ignoring unreadable geocache {}: {e}", path.display());
                Self::new()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io_with_path(e, path))?;
        let mut reader = Reader::from_reader(file);
        let mut cache = Self::new();
        for row in reader.deserialize() {
            let row: CacheRow = row?;
            cache.insert(row.location, Coordinates::new(row.lat, row.lon));
        }
        Ok(cache)
    }

    /// Writes the cache sorted by location.
    ///
    /// An empty cache leaves the file untouched. Returns whether anything was
    /// written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        if self.is_empty() {
            log::debug!("Geocache empty, not writing {}", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
            }
        }

        let file = File::create(path).map_err(|e| Error::io_with_path(e, path))?;
        let mut writer = Writer::from_writer(file);
        for (location, coords) in &self.entries {
            writer.serialize(CacheRow {
                location: location.clone(),
                lat: coords.lat,
                lon: coords.lon,
            })?;
        }
        writer.flush().map_err(|e| Error::io_with_path(e, path))?;

        log::info!("Saved {} cached locations to {}", self.len(), path.display());
        Ok(true)
    }

    /// Cached coordinates of `location`.
    pub fn get(&self, location: &str) -> Option<Coordinates> {
        self.entries.get(location).copied()
    }

    /// Stores coordinates for `location`, replacing any previous value.
    pub fn insert(&mut self, location: impl Into<String>, coords: Coordinates) {
        self.entries.insert(location.into(), coords);
    }

    /// Whether `location` is cached.
    pub fn contains(&self, location: &str) -> bool {
        self.entries.contains_key(location)
    }

    /// Number of cached locations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in location order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Coordinates)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
