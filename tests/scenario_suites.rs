//! Runs the YAML scenario suites under tests/suites.

use invoice_validator::test_harness::{run_all_tests, TestConfig};
use std::env;
use std::path::PathBuf;

#[test]
fn run_all_scenario_suites() {
    let filter = env::var("TEST_FILTER").ok();
    let config = TestConfig {
        test_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/suites"),
        use_colors: false,
    };
    let (passed, failed, skipped) = run_all_tests(filter.as_deref(), &config);

    println!(
        "Scenario summary: {} passed, {} failed, {} skipped",
        passed, failed, skipped
    );

    assert!(passed > 0, "no scenarios were discovered");
    if failed > 0 {
        panic!("{} scenario(s) failed", failed);
    }
}
