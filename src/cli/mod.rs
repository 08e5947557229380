//! The invoice validator command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use walkdir::WalkDir;

use crate::cli::args::{Command, GlobalArgs, OutputFormat, ValidatorArgs};
use crate::cli::output::ResultSummary;
use crate::config::ValidatorConfig;
use crate::errors::{InvoiceError, Result};
use crate::report;
use crate::schema::SchemaSource;
use crate::test_harness::{self, TestConfig};
use crate::upload::{allowed_file, Upload};
use crate::validation::validate_upload;

pub mod args;
pub mod output;

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("invoice_validator=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Dispatches a parsed command line. Validation failures are reported through
/// the exit code; only faults are returned as errors.
pub fn run(args: ValidatorArgs) -> Result<ExitCode> {
    let config = resolve_config(&args.global)?;
    debug!(?config, "resolved configuration");

    match args.command {
        Command::Validate {
            file,
            program,
            format,
            no_report,
        } => {
            let summary = validate_file(&config, &file, &program, !no_report)?;
            emit(format, std::slice::from_ref(&summary), false)?;
            Ok(exit_code(summary.valid))
        }
        Command::Batch {
            dir,
            program,
            format,
            no_report,
        } => {
            let mut summaries = Vec::new();
            for file in find_uploads(&dir, &config.allowed_extensions) {
                match validate_file(&config, &file, &program, !no_report) {
                    Ok(summary) => summaries.push(summary),
                    Err(InvoiceError::Schema(err)) => return Err(err.into()),
                    Err(err) => {
                        let summary =
                            ResultSummary::fault(&program, &file.display().to_string(), &err);
                        warn!(file = %file.display(), error = %err, "skipping upload");
                        eprintln!("{:?}", miette::Report::new(err));
                        summaries.push(summary);
                    }
                }
            }
            if summaries.is_empty() {
                eprintln!("No uploads found under {}", dir.display());
            }
            emit(format, &summaries, true)?;
            Ok(exit_code(summaries.iter().all(|s| s.valid)))
        }
        Command::Programs => {
            let ids = config.schema_source().program_ids()?;
            output::print_programs(&ids);
            Ok(ExitCode::SUCCESS)
        }
        Command::Test { path, filter } => {
            let harness_config = TestConfig {
                test_root: path,
                ..TestConfig::default()
            };
            let (_, failed, _) = test_harness::run_all_tests(filter.as_deref(), &harness_config);
            Ok(exit_code(failed == 0))
        }
    }
}

// ============================================================================
// COMMAND HELPERS
// ============================================================================

/// Defaults, then the config file, then flags.
fn resolve_config(global: &GlobalArgs) -> Result<ValidatorConfig> {
    let mut config = match &global.config {
        Some(path) => ValidatorConfig::load(path)?,
        None => ValidatorConfig::default(),
    };
    if let Some(rules) = &global.rules {
        config.rules_path = rules.clone();
    }
    if let Some(dir) = &global.report_dir {
        config.report_dir = dir.clone();
    }
    if let Some(policy) = global.unknown_format {
        config.unknown_format = policy;
    }
    Ok(config)
}

/// Intake, validation and, when there are errors, the error report.
fn validate_file(
    config: &ValidatorConfig,
    file: &Path,
    program: &str,
    write_report: bool,
) -> Result<ResultSummary> {
    let name = file
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let content = fs::read(file).map_err(|source| InvoiceError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    let upload = Upload::new(&name, content, &config.allowed_extensions)?;

    let source = config.schema_source();
    let result = validate_upload(upload.content(), program, &source, config.options())?;

    let report_path = if write_report && !result.is_valid() {
        Some(report::export(
            &result.messages(),
            upload.file_name(),
            &config.report_dir,
        )?)
    } else {
        None
    };

    Ok(ResultSummary::new(
        program,
        &file.display().to_string(),
        &result,
        report_path.as_deref(),
    ))
}

/// Every accepted upload under `dir`, in file-name order.
fn find_uploads(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| allowed_file(name, extensions))
                .unwrap_or(false)
        })
        .map(|entry| entry.path().to_path_buf())
        .collect()
}

fn emit(format: OutputFormat, summaries: &[ResultSummary], as_list: bool) -> Result<()> {
    match format {
        OutputFormat::Text => output::print_summaries(summaries),
        OutputFormat::Json if as_list => output::print_json(summaries),
        OutputFormat::Json => match summaries.first() {
            Some(summary) => output::print_json(summary),
            None => Ok(()),
        },
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
