//! Integration tests for the CLI pipeline
//!
//! Each test writes its inputs into a temporary directory and runs the same
//! entry point the binary uses.

use std::{fs, path::Path};

use tempfile::TempDir;

use trellis_cli::{AlgorithmArg, Args, CliError, run};

const SERVICE_GRAPH: &str = r#"
[[nodes]]
id = "client"
width = 120.0
height = 40.0

[[nodes]]
id = "gateway"

[[nodes]]
id = "auth"

[[nodes]]
id = "orders"

[[connections]]
source = "client"
target = "gateway"

[[connections]]
source = "gateway"
target = "auth"

[[connections]]
source = "gateway"
target = "orders"
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path.to_string_lossy().into_owned()
}

fn args(input: String, output: &Path) -> Args {
    Args {
        input,
        output: Some(output.to_string_lossy().into_owned()),
        config: None,
        algorithm: None,
        analyze: false,
        log_level: "off".to_string(),
    }
}

fn read_report(path: &Path) -> toml::Table {
    let report = fs::read_to_string(path).expect("report written");
    toml::from_str(&report).expect("report is valid TOML")
}

#[test]
fn test_layout_report_is_written() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(&dir, "graph.toml", SERVICE_GRAPH);
    let output = dir.path().join("layout.toml");

    run(&args(input, &output)).expect("layout succeeds");

    let report = read_report(&output);
    // Four nodes, three connections, no cycle: a tree
    assert_eq!(report["algorithm"].as_str(), Some("tree"));
    let positions = report["positions"].as_table().expect("positions table");
    assert_eq!(positions.len(), 4);
    for id in ["client", "gateway", "auth", "orders"] {
        let position = &positions[id];
        assert!(position["x"].as_float().is_some_and(f64::is_finite), "{id}");
        assert!(position["y"].as_float().is_some_and(f64::is_finite), "{id}");
    }
    assert!(report["metrics"]["width"].as_float().is_some_and(|w| w > 0.0));
}

#[test]
fn test_algorithm_flag_overrides_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(&dir, "graph.toml", SERVICE_GRAPH);
    let config = write(&dir, "config.toml", "[layout]\nalgorithm = \"grid\"\n");
    let output = dir.path().join("layout.toml");

    let mut layered = args(input, &output);
    layered.config = Some(config);
    layered.algorithm = Some(AlgorithmArg::Layered);
    run(&layered).expect("layout succeeds");

    let report = read_report(&output);
    assert_eq!(report["algorithm"].as_str(), Some("layered"));
    assert_eq!(report["metrics"]["edge_crossings"].as_integer(), Some(0));
}

#[test]
fn test_config_file_selects_algorithm() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(&dir, "graph.toml", SERVICE_GRAPH);
    let config = write(
        &dir,
        "config.toml",
        "[layout]\nalgorithm = \"grid\"\n\n[layout.grid]\ncolumns = 4\n",
    );
    let output = dir.path().join("layout.toml");

    let mut grid = args(input, &output);
    grid.config = Some(config);
    run(&grid).expect("layout succeeds");

    let report = read_report(&output);
    assert_eq!(report["algorithm"].as_str(), Some("grid"));
    // A single row
    let positions = report["positions"].as_table().expect("positions table");
    let first_y = positions["client"]["y"].as_float();
    assert!(positions.values().all(|p| p["y"].as_float() == first_y));
}

#[test]
fn test_analyze_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(&dir, "graph.toml", SERVICE_GRAPH);
    let output = dir.path().join("analysis.toml");

    let mut analyze = args(input, &output);
    analyze.analyze = true;
    run(&analyze).expect("analysis succeeds");

    let report = read_report(&output);
    assert_eq!(report["node_count"].as_integer(), Some(4));
    assert_eq!(report["edge_count"].as_integer(), Some(3));
    assert_eq!(report["is_tree"].as_bool(), Some(true));
    assert_eq!(report["has_cycles"].as_bool(), Some(false));
}

#[test]
fn test_malformed_document() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(&dir, "graph.toml", "[[nodes]]\nwidth = 10.0\n");
    let output = dir.path().join("layout.toml");

    let err = run(&args(input, &output)).expect_err("node without id");
    assert!(matches!(err, CliError::Document { .. }));
    assert!(!output.exists());
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("absent.toml").to_string_lossy().into_owned();
    let output = dir.path().join("layout.toml");

    let err = run(&args(input, &output)).expect_err("input does not exist");
    assert!(matches!(err, CliError::Io(_)));
}

#[test]
fn test_invalid_node_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write(&dir, "graph.toml", "[[nodes]]\nid = \"a\"\nwidth = -5.0\n");
    let output = dir.path().join("layout.toml");

    let err = run(&args(input, &output)).expect_err("negative width");
    assert!(matches!(err, CliError::Layout(_)));
}
