//! The combined build command and command dispatch.

use evkg_cli::{Command, ConfigAction, FilterArgs, cmd_build, cmd_geocode, run_command};

use crate::common::{TestHarness, mock_geocoder, no_filters};

#[tokio::test]
async fn test_geocode_then_build_writes_every_artifact() {
    let harness = TestHarness::new();
    cmd_geocode(&harness.config, &no_filters(), &mock_geocoder(), &mut Vec::new())
        .await
        .unwrap();

    let mut out = Vec::new();
    cmd_build(&harness.config, &no_filters(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Map: 3 of 4 locations placed"), "{text}");

    let output = harness.path("output");
    for file in [
        "graph.json",
        "graph.html",
        "map.geojson",
        "map.html",
        "timeline.json",
        "timeline.html",
    ] {
        assert!(output.join(file).exists(), "missing {file}");
    }
}

#[tokio::test]
async fn test_run_command_reads_config_file() {
    let mut harness = TestHarness::new();
    harness.config.graph.min_edge_weight = 2;
    let config_path = harness.write_config();

    let mut out = Vec::new();
    run_command(
        Command::Graph { min_weight: None, top: Some(1), filters: no_filters() },
        Some(&config_path),
        &mut out,
    )
    .await
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Graph: 3 entities, 2 links"), "{text}");
    assert!(text.contains("Ukraine"));
    assert!(!text.contains("Russia  "));
}

#[tokio::test]
async fn test_run_command_applies_filters() {
    let harness = TestHarness::new();
    let config_path = harness.write_config();

    let mut out = Vec::new();
    run_command(
        Command::Summary {
            filters: FilterArgs { entity: Some("russia".into()), ..no_filters() },
        },
        Some(&config_path),
        &mut out,
    )
    .await
    .unwrap();
    assert!(String::from_utf8(out).unwrap().contains("Events: 3 of 6 loaded"));
}

#[tokio::test]
async fn test_run_command_config_path() {
    let harness = TestHarness::new();
    let config_path = harness.write_config();

    let mut out = Vec::new();
    run_command(Command::Config { action: ConfigAction::Path }, Some(&config_path), &mut out)
        .await
        .unwrap();
    assert!(String::from_utf8(out).unwrap().contains(&config_path));
}
