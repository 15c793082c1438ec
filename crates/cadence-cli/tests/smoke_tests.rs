//! Smoke tests for the cadence CLI
//!
//! These tests run the built binary against small effect documents.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command for the cadence binary
fn cadence() -> Command {
    let mut cmd = Command::cargo_bin("cadence").expect("cadence binary should exist");
    cmd.env_remove("RUST_LOG");
    cmd
}

const FADE_YAML: &str = "
timing:
  duration: 2
  iterations: 2
  delay: 1
  direction: alternate
keyframes:
  - { opacity: 0, width: 100 }
  - { opacity: 1, width: 50 }
  - { opacity: 0.5, width: 0 }
";

const PULSE_JSON: &str = r#"{
  "timing": { "duration": 1, "iterations": "infinite", "fill": "none" },
  "keyframes": [
    { "offset": 0, "scale": 1, "easing": "ease-in-out" },
    { "offset": 1, "scale": 2 }
  ]
}"#;

fn document(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    cadence()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    cadence()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("timing"))
        .stdout(predicate::str::contains("sample"))
        .stdout(predicate::str::contains("easing"))
        .stdout(predicate::str::contains("trace"));
}

#[test]
fn test_no_args_fails() {
    cadence().assert().failure();
}

// ============================================================================
// Timing
// ============================================================================

#[test]
fn test_timing_text() {
    let (_dir, path) = document("fade.yaml", FADE_YAML);
    cadence()
        .arg("timing")
        .arg(&path)
        .args(["--at=0,2,6", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active duration 4, end time 5"))
        .stdout(predicate::str::contains("before"))
        .stdout(predicate::str::contains("active"))
        .stdout(predicate::str::contains("after"));
}

#[test]
fn test_timing_json() {
    let (_dir, path) = document("pulse.json", PULSE_JSON);
    let output = cadence()
        .arg("timing")
        .arg(&path)
        .args(["--at", "2.25", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["timing"]["iteration_count"], "Infinity");
    assert_eq!(json["results"][0]["current_iteration"], 2.0);
    assert_eq!(json["results"][0]["time_fraction"], 0.25);
}

// ============================================================================
// Sample
// ============================================================================

#[test]
fn test_sample_text() {
    let (_dir, path) = document("fade.yaml", FADE_YAML);
    cadence()
        .arg("sample")
        .arg(&path)
        .args(["--at", "1.5", "--paused", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(paused)"))
        .stdout(predicate::str::contains("opacity  0.5"))
        .stdout(predicate::str::contains("width    75"));
}

#[test]
fn test_sample_json_after_end() {
    let (_dir, path) = document("fade.yaml", FADE_YAML);
    let output = cadence()
        .arg("sample")
        .arg(&path)
        .args(["--at", "10", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["result"]["phase"], "after");
    assert_eq!(json["paused"], false);
    // two alternate iterations end at the start of the keyframes
    assert_eq!(json["values"][0]["value"], 0.0);
}

// ============================================================================
// Easing
// ============================================================================

#[test]
fn test_easing_text() {
    cadence()
        .args(["easing", "steps(4, start)", "--samples", "5", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("steps(4, start)"))
        .stdout(predicate::str::contains("range [0, 1]"));
}

#[test]
fn test_easing_json() {
    let output = cadence()
        .args(["easing", "linear", "--samples", "3", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["function"], "linear");
    assert_eq!(json["samples"][1]["y"], 0.5);
}

#[test]
fn test_easing_invalid_function() {
    cadence()
        .args(["easing", "wobble"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_easing_too_few_samples() {
    cadence()
        .args(["easing", "ease", "--samples", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--samples"));
}

// ============================================================================
// Trace
// ============================================================================

#[test]
fn test_trace_text() {
    let (_dir, path) = document("fade.yaml", FADE_YAML);
    cadence()
        .arg("trace")
        .arg(&path)
        .args(["--to", "6", "--step", "0.5", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trace"))
        .stdout(predicate::str::contains("event"));
}

#[test]
fn test_trace_json_iteration_events() {
    let (_dir, path) = document("fade.yaml", FADE_YAML);
    let output = cadence()
        .arg("trace")
        .arg(&path)
        .args(["--to", "6", "--step", "0.5", "--iteration-events", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let frames = json.as_array().unwrap();
    assert_eq!(frames.len(), 13);
    let events = frames.iter().filter(|f| f["event"] == true).count();
    assert_eq!(events, 4);
}

#[test]
fn test_trace_rejects_reversed_range() {
    let (_dir, path) = document("fade.yaml", FADE_YAML);
    cadence()
        .arg("trace")
        .arg(&path)
        .args(["--from", "2", "--to", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_file() {
    cadence()
        .args(["timing", "does-not-exist.yaml", "--at", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.yaml"));
}

#[test]
fn test_invalid_document() {
    let (_dir, path) = document("bad.yaml", "timing:\n  duration: -1\n  fill: sideways\n");
    cadence()
        .arg("timing")
        .arg(&path)
        .args(["--at", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ============================================================================
// Bundled demos
// ============================================================================

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn test_demo_documents_load() {
    for name in ["fade.yaml", "bounce.json"] {
        cadence()
            .arg("sample")
            .arg(demo(name))
            .args(["--at", "0.5", "--format", "json"])
            .assert()
            .success();
    }
}
