//! Configuration for the evkg command.
//!
//! The file is TOML with one section per concern:
//!
//! ```toml
//! [data]
//! events_path = "data/events.json"
//! taxonomy_path = "data/taxonomy.json"
//! geocache_path = "data/geocache.csv"
//! output_dir = "output"
//!
//! [geocoding]
//! max_new = 80
//!
//! [graph]
//! min_edge_weight = 1
//!
//! [map]
//! color_mode = "sentiment"
//!
//! [timeline]
//! granularity = "month"
//! ```
//!
//! Every key is optional. The file is located through `--config`, then
//! `$EVKG_CONFIG`, then `<config dir>/evkg/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use evkg_core::{Error, Result};
use evkg_geo::{GeocodingConfig, MapConfig};
use evkg_graph::GraphConfig;
use evkg_timeline::TimelineConfig;

/// Project name, used for the config directory and in messages.
pub const PROJECT_NAME: &str = "evkg";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "EVKG_CONFIG";

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Grouped events JSON document.
    #[serde(default = "default_events_path")]
    pub events_path: PathBuf,

    /// Taxonomy JSON document.
    #[serde(default = "default_taxonomy_path")]
    pub taxonomy_path: PathBuf,

    /// Geocode cache CSV.
    #[serde(default = "default_geocache_path")]
    pub geocache_path: PathBuf,

    /// Directory receiving the HTML and JSON artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_events_path() -> PathBuf {
    PathBuf::from("data/events.json")
}

fn default_taxonomy_path() -> PathBuf {
    PathBuf::from("data/taxonomy.json")
}

fn default_geocache_path() -> PathBuf {
    PathBuf::from("data/geocache.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            events_path: default_events_path(),
            taxonomy_path: default_taxonomy_path(),
            geocache_path: default_geocache_path(),
            output_dir: default_output_dir(),
        }
    }
}

/// Complete evkg configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvkgConfig {
    /// Input and output locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Geocoding service and pacing.
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Graph view.
    #[serde(default)]
    pub graph: GraphConfig,

    /// Map view.
    #[serde(default)]
    pub map: MapConfig,

    /// Timeline view.
    #[serde(default)]
    pub timeline: TimelineConfig,
}

impl EvkgConfig {
    /// `<platform config dir>/evkg/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// Resolves the config file: explicit path, then `$EVKG_CONFIG`, then the
    /// platform default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        Self::default_config_path()
    }

    /// Loads the resolved config file, or defaults if it does not exist.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                log::debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Directory receiving artifacts.
    pub fn output_dir(&self) -> &Path {
        &self.data.output_dir
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use evkg_content::Granularity;
    use evkg_geo::ColorMode;

    #[test]
    fn test_defaults() {
        let config = EvkgConfig::default();
        assert_eq!(config.data.events_path, PathBuf::from("data/events.json"));
        assert_eq!(config.geocoding.max_new, 80);
        assert_eq!(config.graph.top_n, 15);
        assert_eq!(config.map.color_mode, ColorMode::Sentiment);
        assert_eq!(config.timeline.granularity, Granularity::Month);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EvkgConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[data]"));
        assert!(text.contains("[timeline]"));
        let back: EvkgConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[graph]\nmin_edge_weight = 3\n\n[map]\ncolor_mode = \"taxonomy\"\n",
        )
        .unwrap();

        let config = EvkgConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.graph.min_edge_weight, 3);
        assert_eq!(config.graph.top_n, 15);
        assert_eq!(config.map.color_mode, ColorMode::Taxonomy);
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = EvkgConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config, EvkgConfig::default());
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[graph\nbroken").unwrap();
        let err = EvkgConfig::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            EvkgConfig::resolve_config_path(Some("/tmp/explicit.toml")),
            Some(PathBuf::from("/tmp/explicit.toml"))
        );
    }
}
