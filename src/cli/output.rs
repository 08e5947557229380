//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colorizing text output and generating JSON.
//! By centralizing output logic here, we ensure a consistent user experience
//! across all commands.

use serde::Serialize;
use std::io;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::{InvoiceError, Result};
use crate::validation::ValidationResult;

// ============================================================================
// SUMMARY TYPES
// ============================================================================

/// Issue code for an upload whose processing failed outright.
pub const FILE_FAULT_CODE: &str = "file_fault";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub code: &'static str,
    pub message: String,
}

/// What a front end shows for one validated upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub program: String,
    pub file: String,
    pub rows: usize,
    pub cols: usize,
    pub valid: bool,
    pub errors: Vec<IssueSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl ResultSummary {
    pub fn new(program: &str, file: &str, result: &ValidationResult, report: Option<&Path>) -> Self {
        Self {
            program: program.to_string(),
            file: file.to_string(),
            rows: result.row_count(),
            cols: result.column_count(),
            valid: result.is_valid(),
            errors: result
                .issues()
                .iter()
                .map(|issue| IssueSummary {
                    code: issue.code(),
                    message: issue.to_string(),
                })
                .collect(),
            report: report.map(|path| path.display().to_string()),
        }
    }

    /// A failed entry for an upload that could not be processed at all.
    pub fn fault(program: &str, file: &str, error: &InvoiceError) -> Self {
        Self {
            program: program.to_string(),
            file: file.to_string(),
            rows: 0,
            cols: 0,
            valid: false,
            errors: vec![IssueSummary {
                code: FILE_FAULT_CODE,
                message: error.to_string(),
            }],
            report: None,
        }
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Writes the success line or the error list for one upload.
pub fn write_summary<W: WriteColor>(out: &mut W, summary: &ResultSummary) -> io::Result<()> {
    if summary.valid {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(out, "✔ {}", summary.file)?;
        out.reset()?;
        writeln!(
            out,
            ": validation successful for program '{}' ({} rows, {} columns)",
            summary.program, summary.rows, summary.cols
        )?;
        return Ok(());
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "✘ {}", summary.file)?;
    out.reset()?;
    writeln!(
        out,
        ": {} validation error{} for program '{}'",
        summary.errors.len(),
        if summary.errors.len() == 1 { "" } else { "s" },
        summary.program
    )?;
    for issue in &summary.errors {
        writeln!(out, "  • {}", issue.message)?;
    }
    if let Some(report) = &summary.report {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(out, "  error report")?;
        out.reset()?;
        writeln!(out, ": {}", report)?;
    }
    Ok(())
}

pub fn print_summaries(summaries: &[ResultSummary]) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for summary in summaries {
        write_summary(&mut stdout, summary).map_err(|e| InvoiceError::Render(e.to_string()))?;
    }
    Ok(())
}

/// Pretty JSON for one summary or a list of them.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| InvoiceError::Render(e.to_string()))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

pub fn print_programs(ids: &[String]) {
    if ids.is_empty() {
        eprintln!("No programs defined in the rule store.");
        return;
    }
    for id in ids {
        println!("{}", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::schema::{ColumnRule, ColumnType, ProgramSchema};
    use crate::validation::validate;
    use termcolor::NoColor;

    fn summary_for(rows: Vec<Vec<&str>>) -> ResultSummary {
        let doc = Document::from_rows(rows);
        let schema = ProgramSchema::new(
            "P1",
            vec![ColumnRule::new(0, "Amount", ColumnType::Float).required()],
        );
        let result = validate(&doc, &schema);
        ResultSummary::new("P1", "march.csv", &result, None)
    }

    fn render(summary: &ResultSummary) -> String {
        let mut out = NoColor::new(Vec::new());
        write_summary(&mut out, summary).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn success_reports_counts() {
        let text = render(&summary_for(vec![vec!["1.5"], vec!["2"]]));
        assert_eq!(
            text,
            "✔ march.csv: validation successful for program 'P1' (2 rows, 1 columns)\n"
        );
    }

    #[test]
    fn failure_lists_errors_in_order() {
        let text = render(&summary_for(vec![vec![""], vec!["abc"]]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "✘ march.csv: 2 validation errors for program 'P1'");
        assert_eq!(lines[1], "  • Col 1: Missing required value in row 1");
        assert_eq!(lines[2], "  • Col 1: Invalid float value 'abc' in row 2");
    }

    #[test]
    fn fault_entry_is_a_failed_summary() {
        let error = InvoiceError::Render("disk full".to_string());
        let summary = ResultSummary::fault("P1", "broken.csv", &error);
        assert!(!summary.valid);
        assert_eq!((summary.rows, summary.cols), (0, 0));
        assert_eq!(summary.errors[0].code, FILE_FAULT_CODE);
        assert_eq!(summary.errors[0].message, "Failed to render output: disk full");
    }

    #[test]
    fn json_carries_codes() {
        let json = to_json(&summary_for(vec![vec!["abc"]])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["errors"][0]["code"], "invalid_float_value");
        assert!(value.get("report").is_none());
    }
}
