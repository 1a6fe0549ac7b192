//! Connectivity extraction integration tests
//!
//! Exercises the full pipeline against fixture files on disk,
//! including the include closure and pre-processing steps.

use std::fs;
use std::path::Path;

use netreg_core::connectivity::{extract_connectivity, ConnectivityEdge};
use netreg_core::netreg_hocon::ScanOptions;
use tempfile::TempDir;

fn write_fixture(dir: &Path, name: &str, content: &str) {
    if let Some(parent) = dir.join(name).parent() {
        fs::create_dir_all(parent).expect("create fixture dirs");
    }
    fs::write(dir.join(name), content).expect("write fixture");
}

#[test]
fn test_extract_from_single_file() {
    let tmp = TempDir::new().unwrap();
    write_fixture(
        tmp.path(),
        "network.hocon",
        r#"
# Frontman routes everything
"Frontman": {
    tools = ["Baggage", "Flights"]
    instructions = """Route the traveler."""
}
"Baggage": {
    tools = ["Flights"]
}
"Flights": {}
"#,
    );

    let report = extract_connectivity(
        &tmp.path().join("network.hocon"),
        None,
        &ScanOptions::default(),
    )
    .unwrap();

    assert_eq!(
        report.connectivity,
        vec![
            ConnectivityEdge {
                origin: "Frontman".into(),
                tools: vec!["Baggage".into(), "Flights".into()],
            },
            ConnectivityEdge {
                origin: "Baggage".into(),
                tools: vec!["Flights".into()],
            },
            ConnectivityEdge::leaf("Flights"),
        ]
    );
}

#[test]
fn test_include_closure_supplies_leaf_tools() {
    let tmp = TempDir::new().unwrap();
    write_fixture(
        tmp.path(),
        "network.hocon",
        "include \"registries/shared_tools.hocon\"\n\"Agent\": { tools = [\"URLProvider\"] }\n",
    );
    write_fixture(tmp.path(), "shared_tools.hocon", "\"URLProvider\": {}\n");

    let report = extract_connectivity(
        &tmp.path().join("network.hocon"),
        Some(tmp.path()),
        &ScanOptions::default(),
    )
    .unwrap();

    assert_eq!(
        report.connectivity,
        vec![
            ConnectivityEdge {
                origin: "Agent".into(),
                tools: vec!["URLProvider".into()],
            },
            ConnectivityEdge::leaf("URLProvider"),
        ]
    );
}

#[test]
fn test_include_cycles_terminate() {
    let tmp = TempDir::new().unwrap();
    write_fixture(
        tmp.path(),
        "a.hocon",
        "include \"b.hocon\"\n\"A\": { tools = [\"B\"] }\n",
    );
    write_fixture(
        tmp.path(),
        "b.hocon",
        "include \"a.hocon\"\n\"B\": {}\n",
    );

    let report = extract_connectivity(
        &tmp.path().join("a.hocon"),
        Some(tmp.path()),
        &ScanOptions::default(),
    )
    .unwrap();

    let origins: Vec<&str> = report.connectivity.iter().map(|e| e.origin.as_str()).collect();
    assert_eq!(origins, vec!["A", "B"]);
}

#[test]
fn test_missing_include_is_skipped_not_fatal() {
    let tmp = TempDir::new().unwrap();
    write_fixture(
        tmp.path(),
        "network.hocon",
        "include \"gone.hocon\"\n\"Solo\": {}\n",
    );

    let report = extract_connectivity(
        &tmp.path().join("network.hocon"),
        Some(tmp.path()),
        &ScanOptions::default(),
    )
    .unwrap();

    assert_eq!(report.connectivity, vec![ConnectivityEdge::leaf("Solo")]);
}

#[test]
fn test_missing_network_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = extract_connectivity(
        &tmp.path().join("absent.hocon"),
        None,
        &ScanOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_report_serializes_to_expected_wire_shape() {
    let tmp = TempDir::new().unwrap();
    write_fixture(
        tmp.path(),
        "network.hocon",
        "\"Router\": { tools = [\"Billing\"] }\n\"Billing\": {}\n",
    );

    let report = extract_connectivity(
        &tmp.path().join("network.hocon"),
        None,
        &ScanOptions::default(),
    )
    .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "connectivity": [
                { "origin": "Router", "tools": ["Billing"] },
                { "origin": "Billing" }
            ]
        })
    );
}
