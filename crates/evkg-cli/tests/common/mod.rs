//! Fixture workspace shared by the integration tests.

use std::path::PathBuf;

use evkg_cli::{EvkgConfig, FilterArgs};
use evkg_geo::MockGeocoder;
use serde_json::{Value, json};
use tempfile::TempDir;

/// A temporary directory holding events, taxonomy and a config pointing at
/// them.
pub struct TestHarness {
    /// Keeps the directory alive for the test's duration.
    pub dir: TempDir,
    /// Configuration rooted in `dir`.
    pub config: EvkgConfig,
}

impl TestHarness {
    /// Writes the default fixtures.
    pub fn new() -> Self {
        Self::with_events(sample_events())
    }

    /// Writes `events` alongside the default taxonomy.
    pub fn with_events(events: Value) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        let mut config = EvkgConfig::default();
        config.data.events_path = root.join("data/events.json");
        config.data.taxonomy_path = root.join("data/taxonomy.json");
        config.data.geocache_path = root.join("data/geocache.csv");
        config.data.output_dir = root.join("output");
        config.geocoding.delay_ms = 0;

        std::fs::create_dir_all(root.join("data")).unwrap();
        std::fs::write(&config.data.events_path, events.to_string()).unwrap();
        std::fs::write(&config.data.taxonomy_path, sample_taxonomy().to_string()).unwrap();

        Self { dir, config }
    }

    /// Path inside the fixture directory.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Writes the config as TOML and returns its path.
    pub fn write_config(&self) -> String {
        let path = self.path("evkg.toml");
        std::fs::write(&path, self.config.to_toml_string().unwrap()).unwrap();
        path.to_string_lossy().into_owned()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// No filtering.
pub fn no_filters() -> FilterArgs {
    FilterArgs::default()
}

/// Resolves every fixture location except Atlantis.
pub fn mock_geocoder() -> MockGeocoder {
    MockGeocoder::new()
        .with_place("Geneva", 46.2044, 6.1432)
        .with_place("Kyiv", 50.4501, 30.5234)
        .with_place("Brussels", 50.8503, 4.3517)
        .with_failure("Atlantis")
}

/// Sentiment scores for the fixture labels.
pub fn sample_taxonomy() -> Value {
    json!({
        "Diplomacy": {
            "Treaty": { "sentiment": 4 },
            "Summit": { "sentiment": 2 },
            "other": { "sentiment": 1 }
        },
        "Conflict": {
            "Attack": { "sentiment": -6 },
            "Sanctions": { "sentiment": -3 }
        }
    })
}

/// Six dated events over two months plus one undated and one malformed
/// entry.
pub fn sample_events() -> Value {
    json!([
        [
            {
                "event_title": "Peace treaty signed",
                "event_location": "Geneva",
                "event_date_occured": { "kind": "single", "date": "05/01/2024" },
                "entities": [
                    { "name": "United Nations", "tag": "ORG" },
                    { "name": "European Union", "tag": "ORG" },
                    { "name": "Ukraine", "tag": "GPE" }
                ],
                "event_classifications": { "Diplomacy": ["Treaty"] }
            },
            {
                "event_title": "Summit on reconstruction",
                "event_location": "Brussels",
                "event_date_occured": { "kind": "single", "date": "18/01/2024" },
                "entities": [
                    { "name": "European Union", "tag": "ORG" },
                    { "name": "Ukraine", "tag": "GPE" }
                ],
                "event_classifications": { "Diplomacy": ["Summit"] }
            },
            {
                "event_title": "Undated rumour",
                "event_location": "Geneva"
            }
        ],
        [
            {
                "event_title": "Missile attack",
                "event_location": "Kyiv",
                "event_date_occurred": { "kind": "range", "start": "01/02/2024", "end": "03/02/2024" },
                "entities": [
                    { "name": "Russia", "tag": "GPE" },
                    { "name": "Ukraine", "tag": "GPE" }
                ],
                "event_classifications": { "Conflict": ["Attack"] }
            },
            {
                "event_title": "New sanctions package",
                "event_location": "Brussels",
                "event_date_occured": { "kind": "single", "date": "10/02/2024" },
                "entities": [
                    { "name": "European Union", "tag": "ORG" },
                    { "name": "Russia", "tag": "GPE" }
                ],
                "event_classifications": { "Conflict": ["Sanctions"] }
            },
            "malformed entry",
            {
                "event_title": "Second attack",
                "event_location": "Kyiv",
                "event_date_occured": { "kind": "single", "date": "20/02/2024" },
                "entities": [
                    { "name": "Russia", "tag": "GPE" },
                    { "name": "Ukraine", "tag": "GPE" }
                ],
                "event_classifications": { "Conflict": ["Attack"] }
            },
            {
                "event_title": "Lost city sighting",
                "event_location": "Atlantis",
                "event_date_occured": { "kind": "single", "date": "25/02/2024" },
                "entities": [{ "name": "Poseidon", "tag": "PERSON" }],
                "event_classifications": { "Diplomacy": ["Reception"] }
            }
        ]
    ])
}
