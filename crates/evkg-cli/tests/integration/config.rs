//! Config file management through the dispatcher.

use evkg_cli::{Command, ConfigAction, EvkgConfig, run_command};

use crate::common::TestHarness;

async fn config(action: ConfigAction, path: &str) -> String {
    let mut out = Vec::new();
    run_command(Command::Config { action }, Some(path), &mut out)
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_init_set_get_roundtrip() {
    let harness = TestHarness::new();
    let path = harness.path("conf/evkg.toml");
    let path = path.to_str().unwrap();

    config(ConfigAction::Init { file: None, force: false }, path).await;
    assert!(std::path::Path::new(path).exists());

    config(
        ConfigAction::Set { key: "map.color_mode".into(), value: "taxonomy".into() },
        path,
    )
    .await;
    let value = config(ConfigAction::Get { key: "map.color_mode".into() }, path).await;
    assert_eq!(value.trim(), "taxonomy");

    let loaded = EvkgConfig::load(Some(path)).unwrap();
    assert_eq!(loaded.map.color_mode, evkg_geo::ColorMode::Taxonomy);
}

#[tokio::test]
async fn test_set_rejects_invalid_value() {
    let harness = TestHarness::new();
    let path = harness.write_config();

    let mut out = Vec::new();
    let result = run_command(
        Command::Config {
            action: ConfigAction::Set {
                key: "graph.min_edge_weight".into(),
                value: "heavy".into(),
            },
        },
        Some(&path),
        &mut out,
    )
    .await;
    assert!(result.is_err());

    let loaded = EvkgConfig::load(Some(&path)).unwrap();
    assert_eq!(loaded.graph.min_edge_weight, 1);
}
