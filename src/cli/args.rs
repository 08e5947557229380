//! Defines the command-line arguments and subcommands for the validator CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::validation::UnknownFormatPolicy;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "invoice-validator",
    version,
    about = "Validate CSV invoice uploads against per-program column rules."
)]
pub struct ValidatorArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand. Flags override the config file.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Rule store mapping program ids to column rules (JSON or YAML).
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Directory error reports are written to.
    #[arg(long, global = true)]
    pub report_dir: Option<PathBuf>,

    /// How often an unknown date format is reported: once-per-rule or per-row.
    #[arg(long, global = true)]
    pub unknown_format: Option<UnknownFormatPolicy>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate one CSV upload against a program's rules.
    Validate {
        /// The CSV file to validate.
        #[arg(required = true)]
        file: PathBuf,
        /// Program id whose rules apply.
        #[arg(short, long)]
        program: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Do not write an error report.
        #[arg(long)]
        no_report: bool,
    },
    /// Validate every CSV file under a directory.
    Batch {
        /// The directory to search recursively.
        #[arg(required = true)]
        dir: PathBuf,
        /// Program id whose rules apply.
        #[arg(short, long)]
        program: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Do not write error reports.
        #[arg(long)]
        no_report: bool,
    },
    /// List the program ids in the rule store.
    Programs,
    /// Discover and run YAML validation scenarios in a directory.
    Test {
        /// The path to the directory containing scenario files.
        #[arg(default_value = "tests/suites")]
        path: PathBuf,
        /// Only run scenarios whose name contains this text.
        #[arg(long)]
        filter: Option<String>,
    },
}
