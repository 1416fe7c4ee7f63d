//! # CLI Tests
//!
//! Runs the `schemata` binary against the engine's fixture model and checks
//! exit codes and printed documents.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crates/ directory")
        .join("schemata-engine")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn schemata(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemata"))
        .args(args)
        .output()
        .expect("failed to run schemata")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_validate_accepts_fixture_directory() {
    let model = fixture("people.yaml");
    let input = fixture("directory.json");
    let output = schemata(&[
        "validate",
        "--model",
        model.to_str().unwrap(),
        "--schema",
        "directory",
        "--hide-confidential",
        input.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let doc = stdout_json(&output);
    assert_eq!(doc["status"], "ok");
    assert_eq!(doc["meta"]["sanitized"]["ada"]["age"], 36);
    assert_eq!(doc["meta"]["sanitized"]["ada"]["password"], "(confidential)");
    assert_eq!(doc["meta"]["warnings"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_validate_rejects_with_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("person.yaml");
    std::fs::write(&input, "name: ''\nage: -1\n").unwrap();
    let model = fixture("people.yaml");
    let output = schemata(&[
        "validate",
        "-m",
        model.to_str().unwrap(),
        "-s",
        "person",
        input.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let doc = stdout_json(&output);
    assert_eq!(doc["status"], "errors");
    let messages: Vec<&str> = doc["meta"]["list"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["message"].as_str())
        .collect();
    assert!(messages.contains(&"min length violated"), "{messages:?}");
    assert!(messages.contains(&"minimum violated"), "{messages:?}");
    assert!(messages.contains(&"missing field: email"), "{messages:?}");
}

#[test]
fn test_validate_uses_default_schema_from_options_file() {
    let dir = tempfile::tempdir().unwrap();
    let options = dir.path().join("options.json");
    std::fs::write(&options, r#"{"default_schema": "label"}"#).unwrap();
    let input = dir.path().join("label.json");
    std::fs::write(&input, "\"42\"").unwrap();
    let model = fixture("people.yaml");
    let output = schemata(&[
        "validate",
        "--model",
        model.to_str().unwrap(),
        "--options",
        options.to_str().unwrap(),
        input.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["meta"]["sanitized"], "42");
}

#[test]
fn test_validate_unknown_schema_is_operational_error() {
    let model = fixture("people.yaml");
    let input = fixture("directory.json");
    let output = schemata(&[
        "validate",
        "--model",
        model.to_str().unwrap(),
        "--schema",
        "nobody",
        input.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_check_fixture_model() {
    let model = fixture("people.yaml");
    let output = schemata(&["check", model.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("5 schema(s)"), "{text}");
}

#[test]
fn test_check_rejects_bad_model() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("bad.json");
    std::fs::write(&model, r#"{"x": {"type": "list", "meta": {"elements": "missing"}}}"#).unwrap();
    let output = schemata(&["check", model.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("no options matched"), "{text}");
}

#[test]
fn test_metamodel_is_a_valid_model() {
    let output = schemata(&["metamodel"]);
    assert_eq!(output.status.code(), Some(0));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metamodel.json");
    std::fs::write(&path, &output.stdout).unwrap();
    let check = schemata(&["check", path.to_str().unwrap()]);
    assert_eq!(check.status.code(), Some(0), "{}", String::from_utf8_lossy(&check.stdout));
}
