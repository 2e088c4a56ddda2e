//! Summary, table, graph, map and timeline commands.

use evkg_cli::{FilterArgs, cmd_graph, cmd_map, cmd_summary, cmd_table, cmd_timeline, load_table};
use evkg_geo::{ColorMode, GeoCache};
use evkg_content::{Coordinates, Granularity};

use crate::common::{TestHarness, no_filters};

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

fn seed_cache(harness: &TestHarness) {
    let mut cache = GeoCache::new();
    cache.insert("Geneva", Coordinates::new(46.2044, 6.1432));
    cache.insert("Kyiv", Coordinates::new(50.4501, 30.5234));
    cache.save(&harness.config.data.geocache_path).unwrap();
}

#[test]
fn test_summary_reports_counts_and_bounds() {
    let harness = TestHarness::new();
    let mut out = Vec::new();
    cmd_summary(&harness.config, &no_filters(), &mut out).unwrap();
    let text = output(out);

    assert!(text.contains("Events: 6 of 6 loaded"), "{text}");
    assert!(text.contains("Dropped: 1 undated, 1 malformed"), "{text}");
    assert!(text.contains("Dates: 2024-01-05 to 2024-02-25"), "{text}");
    assert!(text.contains("Locations: 4"), "{text}");
    assert!(text.contains("Event types (5): Attack, Reception, Sanctions, Summit, Treaty"), "{text}");
}

#[test]
fn test_filters_narrow_the_table() {
    let harness = TestHarness::new();

    let by_type = FilterArgs { types: vec!["Attack".into()], ..no_filters() };
    let table = load_table(&harness.config, &by_type).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|r| r.location == "Kyiv"));

    let by_entity = FilterArgs { entity: Some("european".into()), ..no_filters() };
    assert_eq!(load_table(&harness.config, &by_entity).unwrap().len(), 3);

    let february = FilterArgs {
        from: chrono::NaiveDate::from_ymd_opt(2024, 2, 1),
        ..no_filters()
    };
    assert_eq!(load_table(&harness.config, &february).unwrap().len(), 4);

    let positive = FilterArgs { min_sentiment: Some(0.5), ..no_filters() };
    assert_eq!(load_table(&harness.config, &positive).unwrap().len(), 3);
}

#[test]
fn test_table_writes_csv_with_cached_coordinates() {
    let harness = TestHarness::new();
    seed_cache(&harness);
    let path = harness.path("exports/events.csv");

    let mut out = Vec::new();
    let rows = cmd_table(&harness.config, &no_filters(), &path, &mut out).unwrap();
    assert_eq!(rows, 6);
    assert!(output(out).contains("(3 with coordinates)"));

    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(csv.lines().count(), 7);
    assert!(csv.contains("46.2044"));
    assert!(csv.contains("Missile attack"));
}

#[test]
fn test_graph_prints_centralities_and_writes_artifacts() {
    let harness = TestHarness::new();
    let mut out = Vec::new();
    let (rows, artifacts) = cmd_graph(&harness.config, &no_filters(), &mut out).unwrap();
    let text = output(out);

    assert!(text.contains("Graph: 4 entities, 5 links"), "{text}");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].entity, "European Union");
    assert_eq!(rows[0].degree_raw, 3);
    assert!(rows.iter().all(|r| r.entity != "Poseidon"));

    assert!(artifacts.json.exists());
    let html = std::fs::read_to_string(&artifacts.html).unwrap();
    assert!(html.contains("Ukraine"));
}

#[test]
fn test_graph_weight_threshold() {
    let mut harness = TestHarness::new();
    harness.config.graph.min_edge_weight = 2;

    let mut out = Vec::new();
    let (rows, _) = cmd_graph(&harness.config, &no_filters(), &mut out).unwrap();
    assert!(output(out).contains("Graph: 3 entities, 2 links"));
    assert_eq!(rows[0].entity, "Ukraine");
    assert_eq!(rows[0].degree_raw, 2);
}

#[test]
fn test_graph_without_edges_still_writes_page() {
    let mut harness = TestHarness::new();
    harness.config.graph.min_edge_weight = 10;

    let mut out = Vec::new();
    let (rows, artifacts) = cmd_graph(&harness.config, &no_filters(), &mut out).unwrap();
    assert!(output(out).contains("No edges remaining"));
    assert!(rows.is_empty());
    assert!(artifacts.html.exists());
}

#[test]
fn test_map_uses_cached_locations_only() {
    let mut harness = TestHarness::new();
    harness.config.map.color_mode = ColorMode::Taxonomy;
    seed_cache(&harness);

    let mut out = Vec::new();
    let artifacts = cmd_map(&harness.config, &no_filters(), &mut out).unwrap();
    assert!(output(out).contains("Map: 2 of 4 locations placed"));

    let geojson: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&artifacts.geojson).unwrap()).unwrap();
    assert_eq!(geojson["features"].as_array().unwrap().len(), 2);
    assert!(artifacts.html.exists());
}

#[test]
fn test_map_without_cache_hints_at_geocode() {
    let harness = TestHarness::new();
    let mut out = Vec::new();
    cmd_map(&harness.config, &no_filters(), &mut out).unwrap();
    let text = output(out);
    assert!(text.contains("Run `evkg geocode`"), "{text}");
    assert!(text.contains("Map: 0 of 4"), "{text}");
}

#[test]
fn test_timeline_by_week() {
    let mut harness = TestHarness::new();
    harness.config.timeline.granularity = Granularity::Week;

    let mut out = Vec::new();
    let artifacts = cmd_timeline(&harness.config, &no_filters(), &mut out).unwrap();
    assert!(artifacts.figures > 0);
    assert!(output(out).contains("Timeline (week)"));
    assert!(artifacts.json.exists());
}

#[test]
fn test_timeline_with_no_matching_events() {
    let harness = TestHarness::new();
    let filters = FilterArgs { types: vec!["Earthquake".into()], ..no_filters() };

    let mut out = Vec::new();
    let artifacts = cmd_timeline(&harness.config, &filters, &mut out).unwrap();
    assert_eq!(artifacts.figures, 0);
    assert!(output(out).contains("No events available"));
}
