// CLI regression tests: exit codes, printed errors, written reports, and
// miette diagnostics for faults.
// Requires: assert_cmd, predicates, tempfile in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn validator() -> Command {
    let mut cmd = Command::cargo_bin("invoice-validator").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

fn fixture(name: &str) -> String {
    format!("{}/{}", FIXTURES, name)
}

#[test]
fn valid_upload_succeeds_with_counts() {
    let reports = tempfile::tempdir().unwrap();
    validator()
        .arg("validate")
        .arg(fixture("acme_valid.csv"))
        .args(["--program", "ACME", "--rules", &fixture("rules.json")])
        .arg("--report-dir")
        .arg(reports.path())
        .assert()
        .success()
        .stdout(contains("validation successful").and(contains("3 rows, 5 columns")));
    assert_eq!(fs::read_dir(reports.path()).unwrap().count(), 0);
}

#[test]
fn invalid_upload_fails_and_writes_report() {
    let reports = tempfile::tempdir().unwrap();
    validator()
        .arg("validate")
        .arg(fixture("acme_errors.csv"))
        .args(["--program", "ACME", "--rules", &fixture("rules.json")])
        .arg("--report-dir")
        .arg(reports.path())
        .assert()
        .failure()
        .code(1)
        .stdout(
            contains("7 validation errors")
                .and(contains("Col 3: Invalid float value '1,000.00' in row 1"))
                .and(contains("ErrorReport_acme_errors.csv")),
        );

    let report = fs::read_to_string(reports.path().join("ErrorReport_acme_errors.csv")).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "Error");
    assert_eq!(lines[1], "Col 1: Missing required value in row 2");
    assert_eq!(lines.len(), 8);
}

#[test]
fn json_output_lists_codes() {
    let output = validator()
        .arg("validate")
        .arg(fixture("acme_errors.csv"))
        .args(["--program", "ACME", "--rules", &fixture("rules.json")])
        .args(["--format", "json", "--no-report"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["program"], "ACME");
    assert_eq!(value["rows"], 3);
    assert_eq!(value["cols"], 5);
    assert_eq!(value["errors"][0]["code"], "missing_required_value");
    assert!(value.get("report").is_none());
}

#[test]
fn unknown_program_is_reported_not_crashed() {
    validator()
        .arg("validate")
        .arg(fixture("acme_valid.csv"))
        .args(["--program", "P9", "--rules", &fixture("rules.json"), "--no-report"])
        .assert()
        .failure()
        .stdout(contains("Program ID 'P9' not found."));
}

#[test]
fn malformed_rules_render_miette_diagnostic() {
    validator()
        .arg("validate")
        .arg(fixture("acme_valid.csv"))
        .args(["--program", "P1", "--rules", &fixture("rules_malformed.json")])
        .assert()
        .failure()
        .stderr(contains("invoice::schema::malformed").or(contains("Malformed rule store")));
}

#[test]
fn non_csv_upload_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("invoice.txt");
    fs::write(&upload, "Amount\n1\n").unwrap();
    validator()
        .arg("validate")
        .arg(&upload)
        .args(["--program", "P1", "--rules", &fixture("rules.json")])
        .assert()
        .failure()
        .stderr(contains("File type not allowed"));
}

#[test]
fn batch_validates_each_upload() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("good.csv"), "Amount\n1.5\n").unwrap();
    fs::write(dir.path().join("bad.csv"), "Amount\nabc\n").unwrap();
    fs::write(dir.path().join("ignored.txt"), "Amount\nabc\n").unwrap();

    let output = validator()
        .arg("batch")
        .arg(dir.path())
        .args(["--program", "P1", "--rules", &fixture("rules.json")])
        .args(["--format", "json", "--no-report"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let summaries = value.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["valid"], false);
    assert_eq!(summaries[1]["valid"], true);
}

#[test]
fn batch_keeps_going_past_a_failing_upload() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a_bad.csv"), "Amount\nabc\n").unwrap();
    fs::write(dir.path().join("b_good.csv"), "Amount\n1.5\n").unwrap();
    // A plain file where the report directory should be.
    let blocked = dir.path().join("reports.txt");
    fs::write(&blocked, "").unwrap();

    let output = validator()
        .arg("batch")
        .arg(dir.path())
        .args(["--program", "P1", "--rules", &fixture("rules.json")])
        .arg("--report-dir")
        .arg(&blocked)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let summaries = value.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["valid"], false);
    assert_eq!(summaries[0]["errors"][0]["code"], "file_fault");
    assert_eq!(summaries[1]["valid"], true);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to write error report"), "{stderr}");
}

#[test]
fn programs_lists_rule_store_keys() {
    validator()
        .arg("programs")
        .args(["--rules", &fixture("rules.json")])
        .assert()
        .success()
        .stdout("ACME\nLEGACY\nP1\n");
}

#[test]
fn per_row_policy_repeats_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("legacy.csv");
    fs::write(&upload, "Posted,Amount\n2024/01/01,1\n2024/01/02,2\n").unwrap();
    let output = validator()
        .arg("validate")
        .arg(&upload)
        .args(["--program", "LEGACY", "--rules", &fixture("rules.json")])
        .args(["--unknown-format", "per-row", "--format", "json", "--no-report"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["errors"].as_array().unwrap().len(), 2);
}
