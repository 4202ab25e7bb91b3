//! End-to-end CLI tests for chatmetrics.
//!
//! These tests run the actual binary against transcript fixtures and check
//! the report it prints or writes.
//!
//! # Test Categories
//!
//! - **Basic functionality**: JSON on stdout, file output
//! - **Options**: language, filters, merge, config file
//! - **Error handling**: Proper error messages and exit codes for bad input
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

// ============================================================================
// Helpers
// ============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn chatmetrics() -> Command {
    Command::cargo_bin("chatmetrics").unwrap()
}

/// Runs the binary and parses the JSON report from stdout.
fn run_json(args: &[&str]) -> serde_json::Value {
    let output = chatmetrics().args(args).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Basic functionality
// ============================================================================

#[test]
fn test_json_report_on_stdout() {
    let input = fixture("us_ios.txt");
    let report = run_json(&[input.to_str().unwrap()]);

    assert_eq!(report["stats"]["total_messages"], 7);
    assert_eq!(report["stats"]["total_authors"], 2);
    assert_eq!(report["bestemmiometro"]["language"], "english");
    assert_eq!(report["insights"][0]["title"], "Total Messages");
}

#[test]
fn test_italian_language_flag() {
    let input = fixture("italian_group.txt");
    let report = run_json(&[input.to_str().unwrap(), "--lang", "it"]);

    assert_eq!(report["bestemmiometro"]["total"], 4);
    assert_eq!(report["bestemmiometro"]["by_author_total"]["Luca"], 4);
    assert_eq!(report["insights"][0]["title"], "Messaggi Totali");
}

#[test]
fn test_csv_output_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("activity.csv");
    let input = fixture("italian_group.txt");

    chatmetrics()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Messages: 9 parsed, 9 analyzed"))
        .stderr(predicate::str::contains("CSV"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("bucket_start;total;Francesca;Giulia;Luca;Marco"));
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn test_explicit_format_overrides_extension() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("report.txt");

    chatmetrics()
        .arg(fixture("us_ios.txt"))
        .args(["-f", "json", "-o"])
        .arg(&output)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["stats"]["total_messages"], 7);
}

#[test]
fn test_week_granularity() {
    let input = fixture("italian_group.txt");
    let report = run_json(&[input.to_str().unwrap(), "-g", "week"]);

    assert_eq!(report["stats"]["granularity"], "week");
    assert_eq!(report["stats"]["time_series"][0]["bucket_start"], "2024-03-11T00:00:00Z");
    assert_eq!(report["stats"]["time_series"][0]["value"], 9);
}

// ============================================================================
// Filters and merging
// ============================================================================

#[test]
fn test_author_filter() {
    let input = fixture("italian_group.txt");
    let report = run_json(&[
        input.to_str().unwrap(),
        "--author",
        "Marco",
        "--author",
        "Giulia",
    ]);

    assert_eq!(report["stats"]["total_messages"], 4);
    assert_eq!(report["stats"]["total_authors"], 2);
}

#[test]
fn test_date_filter() {
    let input = fixture("italian_group.txt");
    let report = run_json(&[
        input.to_str().unwrap(),
        "--from",
        "2024-03-13",
        "--to",
        "2024-03-14",
    ]);

    assert_eq!(report["stats"]["total_messages"], 4);
}

#[test]
fn test_merge_authors() {
    let input = fixture("italian_group.txt");
    let report = run_json(&[input.to_str().unwrap(), "--lang", "it", "--merge", "Giulia=Luca"]);

    assert_eq!(report["stats"]["total_authors"], 3);
    assert_eq!(report["bestemmiometro"]["per_capita"]["Luca"], 80.0);
}

#[test]
fn test_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"language": "italian", "word_limit": 2}"#).unwrap();
    let input = fixture("italian_group.txt");

    let report = run_json(&[
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert_eq!(report["bestemmiometro"]["language"], "italian");
    assert_eq!(report["words"]["words"].as_array().unwrap().len(), 2);
}

#[test]
fn test_include_system_keeps_stats_unchanged() {
    let input = fixture("italian_group.txt");
    let report = run_json(&[input.to_str().unwrap(), "--include-system"]);

    assert_eq!(report["stats"]["total_messages"], 9);
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_missing_input_file() {
    chatmetrics()
        .arg("does_not_exist.txt")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_unrecognized_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "just some notes\nnothing else\n").unwrap();

    chatmetrics()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WhatsApp"));
}

#[test]
fn test_bad_date() {
    chatmetrics()
        .arg(fixture("us_ios.txt"))
        .args(["--from", "15/01/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("15/01/2024"));
}

#[test]
fn test_inverted_range() {
    chatmetrics()
        .arg(fixture("us_ios.txt"))
        .args(["--from", "2024-02-01", "--to", "2024-01-01"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_unknown_output_extension() {
    let dir = tempdir().unwrap();
    chatmetrics()
        .arg(fixture("us_ios.txt"))
        .arg("-o")
        .arg(dir.path().join("report.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("xlsx"));
}

#[test]
fn test_unknown_language_rejected_by_clap() {
    chatmetrics()
        .arg(fixture("us_ios.txt"))
        .args(["--lang", "fr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fr"));
}

#[test]
fn test_help() {
    chatmetrics()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bestemmiometro"))
        .stdout(predicate::str::contains("--merge"));
}
