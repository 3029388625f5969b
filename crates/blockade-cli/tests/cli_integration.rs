//! Runs the `blockade` binary end to end.

use std::fs;
use std::process::Command;

const HAZARD: &str = r#"{
    "radius": 1.0,
    "partitions": [
        { "name": "north", "nodes": ["a", "b", "c"], "edges": [["a", "b"], ["b", "c"], ["a", "c"]] },
        { "name": "south", "nodes": ["x", "y"] }
    ]
}"#;

fn blockade() -> Command {
    Command::new(env!("CARGO_BIN_EXE_blockade"))
}

#[test]
fn test_json_input_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("zones.json");
    let output = dir.path().join("report.json");
    let telemetry = dir.path().join("telemetry.jsonl");
    fs::write(&input, HAZARD).unwrap();

    let result = blockade()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--telemetry")
        .arg(&telemetry)
        .output()
        .expect("Failed to execute blockade");
    assert!(
        result.status.success(),
        "blockade failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("north: 3 vertices, 3 edges -> 3 colors"), "{}", stdout);

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let partitions = report["partitions"].as_array().unwrap();
    assert_eq!(partitions.len(), 2);
    assert_eq!(partitions[0]["partition"], "north");
    assert_eq!(partitions[0]["num_colors"], 3);
    assert_eq!(partitions[1]["num_colors"], 1);

    for node in partitions[0]["nodes"].as_array().unwrap() {
        assert!(node["id"].is_string());
        assert!(node["x"].as_f64().unwrap() >= 0.0);
        assert!(node["y"].as_f64().unwrap() >= 0.0);
        assert!(node["color"].as_u64().unwrap() >= 1);
    }

    assert_eq!(fs::read_to_string(&telemetry).unwrap().lines().count(), 4);
}

#[test]
fn test_dimacs_input_report_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("path.col");
    fs::write(&input, "c path on three vertices\np edge 3 2\ne 1 2\ne 2 3\n").unwrap();

    let result = blockade()
        .arg("--input")
        .arg(&input)
        .args(["--oracle", "heuristic", "--candidates", "2", "--parallel"])
        .output()
        .expect("Failed to execute blockade");
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    let partition = &report["partitions"][0];
    assert_eq!(partition["partition"], "path");
    assert_eq!(partition["oracle"], "heuristic");
    assert_eq!(partition["num_colors"], 2);
    let ids: Vec<_> = partition["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn test_radius_mismatch_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("zones.json");
    fs::write(&input, HAZARD).unwrap();

    let result = blockade()
        .arg("--input")
        .arg(&input)
        .args(["--radius", "2.5"])
        .output()
        .expect("Failed to execute blockade");
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Inconsistent configuration"), "{}", stderr);
}

#[test]
fn test_config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("zones.json");
    let config = dir.path().join("blockade.toml");
    fs::write(&input, HAZARD).unwrap();
    fs::write(&config, "[oracle]\nstrategy = \"heuristic\"\nshots = 64\n").unwrap();

    let result = blockade()
        .arg("--input")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to execute blockade");
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["partitions"][0]["oracle"], "heuristic");
}
