//! End-to-end tests of the `rcpt` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use tempfile::TempDir;

const RECEIPTS: &str = r#"[
  {"date": "2024-01-05", "company": "Acme", "category": "Gas", "description": "fuel",
   "total": 40.0, "totalTax": 2.0, "gst": 2.0, "pst": 0.0},
  {"date": "2024-02-10", "company": "Beta", "category": "Dining", "description": "lunch",
   "total": 21.5, "totalTax": 1.5, "gst": 1.0, "pst": 0.5},
  {"date": "2024-03-02", "company": "Cafe \"Central\"", "category": "Dining", "description": "coffee",
   "total": 4.25, "totalTax": 0.25, "gst": 0.25, "pst": 0.0}
]"#;

/// A temp home with the receipt file written into it.
fn setup() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("receipts.json"), RECEIPTS).unwrap();
    dir
}

fn rcpt(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rcpt").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join("config"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_filter_csv_by_category() {
    let home = setup();
    let stdout = stdout_of(
        rcpt(home.path())
            .arg("filter")
            .arg(home.path().join("receipts.json"))
            .args(["--category", "Dining", "--format", "csv"]),
    );

    assert_eq!(
        stdout,
        "Date,Company,Category,Description,GST,PST,Total Tax,Total\n\
         \"2024-03-02\",\"Cafe \"\"Central\"\"\",\"Dining\",\"coffee\",0.25,0.00,0.25,4.25\n\
         \"2024-02-10\",\"Beta\",\"Dining\",\"lunch\",1.00,0.50,1.50,21.50\n"
    );
}

#[test]
fn test_filter_search_and_date_range() {
    let home = setup();
    let stdout = stdout_of(
        rcpt(home.path())
            .arg("filter")
            .arg(home.path().join("receipts.json"))
            .args(["--search", "FUEL", "--from", "2024-01-05", "--to", "2024-01-05", "--format", "text"]),
    );

    assert!(stdout.starts_with("Acme\n"));
    assert!(stdout.contains("Grand Total: $40.00"));
    assert!(!stdout.contains("Beta"));
}

#[test]
fn test_filter_invalid_date_shows_empty_state() {
    let home = setup();
    rcpt(home.path())
        .arg("filter")
        .arg(home.path().join("receipts.json"))
        .args(["--from", "not-a-date"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No Receipts Match Filters"));
}

#[test]
fn test_filter_lists_categories() {
    let home = setup();
    let stdout = stdout_of(
        rcpt(home.path())
            .arg("filter")
            .arg(home.path().join("receipts.json"))
            .arg("--categories"),
    );

    assert_eq!(stdout, "Dining\nGas\n");
}

#[test]
fn test_export_writes_filtered_view() {
    let home = setup();
    let out = home.path().join("out");

    rcpt(home.path())
        .arg("filter")
        .arg(home.path().join("receipts.json"))
        .args(["--category", "Gas", "--export"])
        .arg(&out)
        .assert()
        .success();

    let csv = fs::read_to_string(out.join("receipts.csv")).unwrap();
    assert_eq!(
        csv,
        "Date,Company,Category,Description,GST,PST,Total Tax,Total\n\
         \"2024-01-05\",\"Acme\",\"Gas\",\"fuel\",2.00,0.00,2.00,40.00"
    );
}

#[test]
fn test_export_skipped_for_empty_view() {
    let home = setup();
    let out = home.path().join("out");

    rcpt(home.path())
        .arg("filter")
        .arg(home.path().join("receipts.json"))
        .args(["--category", "Travel", "--export"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("No receipts to export"));

    assert!(!out.join("receipts.csv").exists());
}

#[test]
fn test_scan_requires_api_key() {
    let home = setup();
    let image = home.path().join("receipt.png");
    fs::write(&image, b"\x89PNG\r\n\x1a\n").unwrap();

    rcpt(home.path())
        .env_remove("API_KEY")
        .arg("scan")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY environment variable not set"));
}

#[test]
fn test_config_set_then_get() {
    let home = setup();

    rcpt(home.path())
        .args(["config", "set", "extraction.model", "gemini-2.0-flash"])
        .assert()
        .success();

    let stdout = stdout_of(rcpt(home.path()).args(["config", "get", "extraction.model"]));
    assert_eq!(stdout, "\"gemini-2.0-flash\"\n");

    rcpt(home.path())
        .args(["config", "set", "extraction.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));

    rcpt(home.path())
        .args(["config", "get", "export.file_name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_path() {
    let home = setup();
    rcpt(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("not created"));
}
