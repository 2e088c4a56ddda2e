//! Geocoding against the mock geocoder.

use evkg_cli::{FilterArgs, cmd_geocode};
use evkg_geo::{GeoCache, MockGeocoder};

use crate::common::{TestHarness, mock_geocoder, no_filters};

#[tokio::test]
async fn test_geocode_fills_and_saves_cache() {
    let harness = TestHarness::new();
    let geocoder = mock_geocoder();

    let mut out = Vec::new();
    let report = cmd_geocode(&harness.config, &no_filters(), &geocoder, &mut out)
        .await
        .expect("geocode should succeed");

    assert_eq!(report.attempted, 4);
    assert_eq!(report.resolved, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(geocoder.calls(), 4);

    let cache = GeoCache::load(&harness.config.data.geocache_path);
    assert_eq!(cache.len(), 3);
    assert!(cache.contains("Kyiv"));
    assert!(!cache.contains("Atlantis"));
    assert!(String::from_utf8(out).unwrap().contains("cache holds 3"));
}

#[tokio::test]
async fn test_geocode_skips_cached_locations() {
    let harness = TestHarness::new();
    cmd_geocode(&harness.config, &no_filters(), &mock_geocoder(), &mut Vec::new())
        .await
        .unwrap();

    // Only the failed lookup is retried.
    let geocoder = mock_geocoder();
    let report = cmd_geocode(&harness.config, &no_filters(), &geocoder, &mut Vec::new())
        .await
        .unwrap();
    assert_eq!(report.attempted, 1);
    assert_eq!(geocoder.calls(), 1);
}

#[tokio::test]
async fn test_geocode_respects_max_new() {
    let mut harness = TestHarness::new();
    harness.config.geocoding.max_new = 2;
    let geocoder = mock_geocoder();

    let report = cmd_geocode(&harness.config, &no_filters(), &geocoder, &mut Vec::new())
        .await
        .unwrap();
    assert_eq!(report.attempted, 2);
    assert_eq!(geocoder.calls(), 2);
}

#[tokio::test]
async fn test_geocode_nothing_pending() {
    let harness = TestHarness::new();
    let filters = FilterArgs { types: vec!["Nothing".into()], ..no_filters() };
    let geocoder = MockGeocoder::new();

    let mut out = Vec::new();
    let report = cmd_geocode(&harness.config, &filters, &geocoder, &mut out)
        .await
        .unwrap();
    assert_eq!(report.attempted, 0);
    assert_eq!(geocoder.calls(), 0);
    assert!(String::from_utf8(out).unwrap().contains("already cached"));
    assert!(!harness.config.data.geocache_path.exists());
}

#[tokio::test(start_paused = true)]
async fn test_geocode_paces_requests() {
    let mut harness = TestHarness::new();
    harness.config.geocoding.delay_ms = 1000;
    let geocoder = mock_geocoder();

    let started = tokio::time::Instant::now();
    let report = cmd_geocode(&harness.config, &no_filters(), &geocoder, &mut Vec::new())
        .await
        .unwrap();
    assert_eq!(report.attempted, 4);
    assert!(started.elapsed() >= std::time::Duration::from_secs(4));
}
