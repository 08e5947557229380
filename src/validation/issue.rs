//! The findings a validation call can produce.
//!
//! Column numbers in messages are 1-based (`position + 1`), as are row numbers.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("Program ID '{program_id}' not found.")]
    ProgramNotFound { program_id: String },

    #[error("Validation error: {cause}")]
    DocumentUnreadable { cause: String },

    #[error("Col {column}: Missing column for '{name}'")]
    MissingColumn { column: usize, name: String },

    #[error("Col {column}: Missing required value in row {row}")]
    MissingRequiredValue { column: usize, row: usize },

    #[error("Col {column}: Invalid float value '{value}' in row {row}")]
    InvalidFloatValue {
        column: usize,
        value: String,
        row: usize,
    },

    #[error("Col {column}: Unknown date format '{format}' in rules.")]
    UnknownDateFormat { column: usize, format: String },

    #[error("Col {column}: Date format incorrect '{value}' in row {row}. Expected format: {format}")]
    InvalidDateValue {
        column: usize,
        value: String,
        row: usize,
        format: String,
    },
}

impl ValidationIssue {
    /// Stable machine-readable kind.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ProgramNotFound { .. } => "program_not_found",
            Self::DocumentUnreadable { .. } => "document_unreadable",
            Self::MissingColumn { .. } => "missing_column",
            Self::MissingRequiredValue { .. } => "missing_required_value",
            Self::InvalidFloatValue { .. } => "invalid_float_value",
            Self::UnknownDateFormat { .. } => "unknown_date_format",
            Self::InvalidDateValue { .. } => "invalid_date_value",
        }
    }

    /// The 1-based data row the issue points at, if it is a per-cell issue.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::MissingRequiredValue { row, .. }
            | Self::InvalidFloatValue { row, .. }
            | Self::InvalidDateValue { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// The 1-based column the issue points at, if any.
    pub fn column(&self) -> Option<usize> {
        match self {
            Self::ProgramNotFound { .. } | Self::DocumentUnreadable { .. } => None,
            Self::MissingColumn { column, .. }
            | Self::MissingRequiredValue { column, .. }
            | Self::InvalidFloatValue { column, .. }
            | Self::UnknownDateFormat { column, .. }
            | Self::InvalidDateValue { column, .. } => Some(*column),
        }
    }
}
