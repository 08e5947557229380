//! The column validator.
//!
//! Rules are checked in schema order and, within a rule, rows in document
//! order, so issues come out rule-major, row-minor.

use tracing::{debug, info, warn};

use super::{
    float::is_permissive_decimal, DateFormat, UnknownFormatPolicy, ValidationIssue,
    ValidationOptions, ValidationReporter, ValidationResult,
};
use crate::document::Document;
use crate::errors::SchemaLoadError;
use crate::schema::{ColumnRule, ColumnType, ProgramSchema, SchemaLookup, SchemaSource};

/// Checks each column rule of a schema against a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnValidator {
    options: ValidationOptions,
}

/// How a `date` rule's format token resolved.
#[derive(Clone, Copy)]
enum DateCheck<'a> {
    Known(DateFormat, &'a str),
    Unknown(&'a str),
}

impl ColumnValidator {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// Runs every rule of `schema` against `document`, reporting in order.
    pub fn check_document(
        &self,
        document: &Document,
        schema: &ProgramSchema,
        reporter: &mut impl ValidationReporter,
    ) {
        for rule in &schema.columns {
            self.check_rule(document, rule, reporter);
        }
    }

    /// Runs a single rule against every row of `document`.
    pub fn check_rule(
        &self,
        document: &Document,
        rule: &ColumnRule,
        reporter: &mut impl ValidationReporter,
    ) {
        let column = rule.column_label();
        if rule.position >= document.column_count() {
            debug!(column, name = %rule.name, "rule points past the last column");
            reporter.report(ValidationIssue::MissingColumn {
                column,
                name: rule.name.clone(),
            });
            return;
        }

        debug!(column, name = %rule.name, kind = %rule.column_type, "checking column");
        let date_check = match rule.column_type {
            ColumnType::Date => Some(resolve_date_format(rule)),
            _ => None,
        };
        let mut unknown_format_reported = false;

        for (index, raw) in document.column(rule.position).enumerate() {
            let row = index + 1;
            let value = raw.trim();

            if value.is_empty() {
                if rule.required {
                    reporter.report(ValidationIssue::MissingRequiredValue { column, row });
                }
                continue;
            }

            match rule.column_type {
                ColumnType::Float => {
                    if !is_permissive_decimal(value) {
                        reporter.report(ValidationIssue::InvalidFloatValue {
                            column,
                            value: value.to_string(),
                            row,
                        });
                    }
                }
                ColumnType::Date => match date_check {
                    Some(DateCheck::Known(format, token)) => {
                        if format.parse(value).is_none() {
                            reporter.report(ValidationIssue::InvalidDateValue {
                                column,
                                value: value.to_string(),
                                row,
                                format: token.to_string(),
                            });
                        }
                    }
                    Some(DateCheck::Unknown(token)) => {
                        let repeat = self.options.unknown_format == UnknownFormatPolicy::PerRow;
                        if repeat || !unknown_format_reported {
                            reporter.report(ValidationIssue::UnknownDateFormat {
                                column,
                                format: token.to_string(),
                            });
                            unknown_format_reported = true;
                        }
                    }
                    None => {}
                },
                // Cells are always text.
                ColumnType::String => {}
            }
        }
    }
}

fn resolve_date_format(rule: &ColumnRule) -> DateCheck<'_> {
    let token = rule.format.as_deref().unwrap_or("");
    match DateFormat::from_token(token) {
        Some(format) => DateCheck::Known(format, token),
        None => DateCheck::Unknown(token),
    }
}

// =====================
// Public API
// =====================

/// Validates `document` against `schema` with default options.
pub fn validate(document: &Document, schema: &ProgramSchema) -> ValidationResult {
    validate_with(document, schema, ValidationOptions::default())
}

pub fn validate_with(
    document: &Document,
    schema: &ProgramSchema,
    options: ValidationOptions,
) -> ValidationResult {
    let mut result = ValidationResult::with_counts(document.row_count(), document.column_count());
    ColumnValidator::new(options).check_document(document, schema, &mut result);
    info!(
        program = %schema.program_id,
        rows = result.row_count(),
        columns = result.column_count(),
        issues = result.issues().len(),
        "validated document"
    );
    result
}

/// Resolves `program_id`, reads `content` as CSV and validates it.
///
/// Only a malformed or unreadable rule store is an `Err`. An unknown program
/// or an unreadable document becomes a single-issue result with zero counts.
pub fn validate_upload(
    content: impl AsRef<[u8]>,
    program_id: &str,
    source: &dyn SchemaSource,
    options: ValidationOptions,
) -> Result<ValidationResult, SchemaLoadError> {
    let schema = match source.get_schema(program_id)? {
        SchemaLookup::Found(schema) => schema,
        SchemaLookup::NotFound { program_id } => {
            warn!(program = %program_id, "program not found in rule store");
            return Ok(ValidationResult::aborted(
                ValidationIssue::ProgramNotFound { program_id },
            ));
        }
    };

    let document = match Document::parse_csv(content) {
        Ok(document) => document,
        Err(err) => {
            warn!(program = %program_id, cause = %err, "document unreadable");
            return Ok(ValidationResult::aborted(
                ValidationIssue::DocumentUnreadable { cause: err.cause },
            ));
        }
    };

    Ok(validate_with(&document, &schema, options))
}
