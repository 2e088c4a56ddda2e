//! Configuration types for geocoding and the map view.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// GeocodingConfig
// ============================================================================

/// Geocoding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Search endpoint of the Nominatim service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of new locations looked up per run.
    #[serde(default = "default_max_new")]
    pub max_new: usize,

    /// Pause after every lookup, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_endpoint() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_user_agent() -> String {
    "event_dashboard".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_new() -> usize {
    80
}

fn default_delay_ms() -> u64 {
    1000
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_new: default_max_new(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl GeocodingConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Inter-request delay as a `Duration`.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// ============================================================================
// ColorMode
// ============================================================================

/// How map markers are coloured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Green, gray or red by average sentiment.
    #[default]
    Sentiment,
    /// Palette colour of the dominant event type.
    Taxonomy,
}

impl ColorMode {
    /// Lowercase name as used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ColorMode::Sentiment => "sentiment",
            ColorMode::Taxonomy => "taxonomy",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = evkg_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentiment" => Ok(ColorMode::Sentiment),
            "taxonomy" => Ok(ColorMode::Taxonomy),
            other => Err(evkg_core::Error::config(format!(
                "unknown color mode '{other}' (expected 'sentiment' or 'taxonomy')"
            ))),
        }
    }
}

// ============================================================================
// MapConfig
// ============================================================================

/// Map view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Marker colouring.
    #[serde(default)]
    pub color_mode: ColorMode,

    /// Average sentiment below which a marker is red.
    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f64,

    /// Average sentiment above which a marker is green.
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,

    /// Radius of the least active location.
    #[serde(default = "default_min_radius")]
    pub min_radius: u32,

    /// Radius of the most active location.
    #[serde(default = "default_max_radius")]
    pub max_radius: u32,

    /// Titles listed per location popup.
    #[serde(default = "default_max_titles")]
    pub max_titles: usize,

    /// Whether the HTML page carries a legend.
    #[serde(default = "default_legend")]
    pub legend: bool,
}

fn default_negative_threshold() -> f64 {
    -1.0
}

fn default_positive_threshold() -> f64 {
    1.0
}

fn default_min_radius() -> u32 {
    4
}

fn default_max_radius() -> u32 {
    10
}

fn default_max_titles() -> usize {
    12
}

fn default_legend() -> bool {
    true
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::default(),
            negative_threshold: default_negative_threshold(),
            positive_threshold: default_positive_threshold(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            max_titles: default_max_titles(),
            legend: default_legend(),
        }
    }
}
