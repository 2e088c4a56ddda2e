//! Timeline configuration.

use serde::{Deserialize, Serialize};

use evkg_content::Granularity;

/// Timeline view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Period size.
    #[serde(default)]
    pub granularity: Granularity,

    /// Event types plotted in the type figure.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Rolling mean window, in periods.
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
}

fn default_top_k() -> usize {
    10
}

fn default_rolling_window() -> usize {
    3
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            top_k: default_top_k(),
            rolling_window: default_rolling_window(),
        }
    }
}
