//! Validation Scenario Harness
//!
//! Provides reusable discovery, execution, and reporting for YAML-based
//! validation scenarios. Each scenario carries its own rule store and CSV
//! text, runs through [`validate_upload`], and compares the outcome against
//! its expectations.
//!
//! # Scenario Format
//!
//! ```yaml
//! - name: "required amount"
//!   program: P1
//!   rules:                           # inline rule store
//!     P1:
//!       columns:
//!         - { position: 0, name: Amount, type: float, required: true }
//!   csv: "Amount\n10.50\n\"\"\nabc\n"
//!   expected_errors:                 # exact, ordered
//!     - "Col 1: Missing required value in row 2"
//!     - "Col 1: Invalid float value 'abc' in row 3"
//!   expect_error_codes: [missing_required_value, invalid_float_value]
//!   rows: 3
//!   cols: 1
//!   unknown_format: per-row          # optional
//!   skip: false                      # optional, defaults to false
//!   only: false                      # optional, defaults to false
//! ```
//!
//! `rules_text` may replace `rules` to supply a raw JSON store, and
//! `expect_load_error: true` asserts that the store is rejected.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::schema::{InMemorySchemaSource, ProgramSchema};
use crate::validation::{validate_upload, UnknownFormatPolicy, ValidationOptions, ValidationResult};

// =============================================================================
// CORE TYPES
// =============================================================================

/// Represents the result of executing a single scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Pass { file: String, name: String },
    Fail {
        file: String,
        name: String,
        error: String,
    },
    Skipped {
        file: String,
        name: String,
        reason: String,
    },
}

/// A single YAML validation scenario.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub name: String,
    pub program: String,
    #[serde(default)]
    pub rules: BTreeMap<String, ProgramSchema>,
    pub rules_text: Option<String>,
    pub csv: String,
    pub expected_errors: Option<Vec<String>>,
    pub expect_error_codes: Option<Vec<String>>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub unknown_format: Option<UnknownFormatPolicy>,
    #[serde(default)]
    pub expect_load_error: bool,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub only: bool,
}

/// Configuration for scenario execution and reporting.
pub struct TestConfig {
    pub test_root: PathBuf,
    pub use_colors: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            test_root: PathBuf::from("tests/suites"),
            use_colors: atty::is(atty::Stream::Stderr),
        }
    }
}

// Color constants for terminal output
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

impl TestConfig {
    /// Apply color formatting to text if colors are enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

// =============================================================================
// DISCOVERY AND LOADING
// =============================================================================

/// Discovers all YAML files recursively under the given root directory.
pub fn discover_yaml_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Load and parse scenarios from a YAML file.
pub fn load_test_cases(path: &Path) -> Result<Vec<TestCase>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_yaml::from_str::<Vec<TestCase>>(&content)
        .map_err(|e| format!("Failed to parse YAML in {}: {}", path.display(), e))
}

/// Helper for scenario skipping logic.
pub fn skip_reason(case: &TestCase, has_only: bool, filter: Option<&str>) -> Option<String> {
    if has_only && !case.only {
        return Some("Not marked 'only' in 'only' mode".to_string());
    }
    if case.skip {
        return Some("Marked 'skip'".to_string());
    }
    if let Some(f) = filter {
        if !case.name.to_lowercase().contains(&f.to_lowercase()) {
            return Some(format!("Filtered out by substring: {}", f));
        }
    }
    None
}

// =============================================================================
// EXECUTION
// =============================================================================

fn build_source(case: &TestCase) -> Result<InMemorySchemaSource, String> {
    if let Some(text) = &case.rules_text {
        return InMemorySchemaSource::from_json_str(text).map_err(|e| e.to_string());
    }
    let mut source = InMemorySchemaSource::new();
    for (id, schema) in &case.rules {
        source.insert(ProgramSchema::new(id.clone(), schema.columns.clone()));
    }
    Ok(source)
}

/// Returns the first expectation the result does not meet.
fn check_expectations(case: &TestCase, result: &ValidationResult) -> Option<String> {
    if let Some(expected) = &case.expected_errors {
        let actual = result.messages();
        if &actual != expected {
            return Some(format!(
                "errors differ\n      expected: {:?}\n      actual:   {:?}",
                expected, actual
            ));
        }
    }
    if let Some(expected) = &case.expect_error_codes {
        let actual: Vec<&str> = result.issues().iter().map(|i| i.code()).collect();
        if actual != *expected {
            return Some(format!(
                "error codes differ\n      expected: {:?}\n      actual:   {:?}",
                expected, actual
            ));
        }
    }
    if let Some(rows) = case.rows {
        if rows != result.row_count() {
            return Some(format!("expected {} rows, got {}", rows, result.row_count()));
        }
    }
    if let Some(cols) = case.cols {
        if cols != result.column_count() {
            return Some(format!("expected {} columns, got {}", cols, result.column_count()));
        }
    }
    None
}

/// Runs one scenario through the full lookup → parse → validate path.
pub fn run_test_case(case: &TestCase, file: &str) -> TestResult {
    let fail = |error: String| TestResult::Fail {
        file: file.to_string(),
        name: case.name.clone(),
        error,
    };
    let pass = || TestResult::Pass {
        file: file.to_string(),
        name: case.name.clone(),
    };

    let options = ValidationOptions {
        unknown_format: case.unknown_format.unwrap_or_default(),
    };
    let outcome = build_source(case).and_then(|source| {
        validate_upload(case.csv.as_bytes(), &case.program, &source, options)
            .map_err(|e| e.to_string())
    });

    match (outcome, case.expect_load_error) {
        (Err(_), true) => pass(),
        (Err(e), false) => fail(format!("rule store rejected: {}", e)),
        (Ok(_), true) => fail("expected the rule store to be rejected".to_string()),
        (Ok(result), false) => match check_expectations(case, &result) {
            Some(error) => fail(error),
            None => pass(),
        },
    }
}

// =============================================================================
// SUITE EXECUTION AND REPORTING
// =============================================================================

/// Runs every scenario under `config.test_root`; returns (passed, failed, skipped).
pub fn run_all_tests(filter: Option<&str>, config: &TestConfig) -> (usize, usize, usize) {
    let files = discover_yaml_files(&config.test_root);
    let mut results = Vec::new();

    let mut loaded = Vec::new();
    for path in &files {
        let display = path.display().to_string();
        match load_test_cases(path) {
            Ok(cases) => loaded.push((display, cases)),
            Err(error) => results.push(TestResult::Fail {
                file: display,
                name: "<load>".to_string(),
                error,
            }),
        }
    }

    let has_only = loaded
        .iter()
        .any(|(_, cases)| cases.iter().any(|case| case.only));

    for (file, cases) in &loaded {
        for case in cases {
            let result = match skip_reason(case, has_only, filter) {
                Some(reason) => TestResult::Skipped {
                    file: file.clone(),
                    name: case.name.clone(),
                    reason,
                },
                None => run_test_case(case, file),
            };
            results.push(result);
        }
    }

    report_results(&results, config)
}

fn report_results(results: &[TestResult], config: &TestConfig) -> (usize, usize, usize) {
    let (mut passed, mut failed, mut skipped) = (0, 0, 0);
    for result in results {
        match result {
            TestResult::Pass { .. } => passed += 1,
            TestResult::Fail { file, name, error } => {
                failed += 1;
                eprintln!("{} {} ({})", config.colorize("FAIL", RED), name, file);
                eprintln!("      {}", error);
            }
            TestResult::Skipped { .. } => skipped += 1,
        }
    }

    let summary = format!(
        "{} passed, {} failed, {} skipped",
        passed, failed, skipped
    );
    let color = match (failed, skipped) {
        (0, 0) => GREEN,
        (0, _) => YELLOW,
        _ => RED,
    };
    eprintln!("{}", config.colorize(&summary, color));
    (passed, failed, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(yaml: &str) -> TestCase {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn passing_scenario() {
        let case = case(
            r#"
name: ok
program: P1
rules:
  P1:
    columns:
      - { position: 0, name: Amount, type: float }
csv: "Amount\n1.5\n"
expected_errors: []
rows: 1
cols: 1
"#,
        );
        assert!(matches!(run_test_case(&case, "inline"), TestResult::Pass { .. }));
    }

    #[test]
    fn mismatched_counts_fail() {
        let case = case(
            r#"
name: wrong rows
program: P1
rules:
  P1: { columns: [] }
csv: "Amount\n1.5\n"
rows: 5
"#,
        );
        match run_test_case(&case, "inline") {
            TestResult::Fail { error, .. } => assert_eq!(error, "expected 5 rows, got 1"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn load_error_expectation() {
        let case = case(
            r#"
name: bad store
program: P1
rules_text: '{"P1": {"columns": [{"position": -1, "name": "X", "type": "float"}]}}'
csv: "a\n"
expect_load_error: true
"#,
        );
        assert!(matches!(run_test_case(&case, "inline"), TestResult::Pass { .. }));
    }

    #[test]
    fn only_mode_skips_unmarked_cases() {
        let plain = case("name: a\nprogram: P\ncsv: ''\n");
        assert!(skip_reason(&plain, true, None).is_some());
        assert!(skip_reason(&plain, false, Some("A")).is_none());
        assert!(skip_reason(&plain, false, Some("zzz")).is_some());
    }
}
