pub mod date;
pub mod float;
pub mod issue;
pub mod validator;

// Re-exports for concise imports
pub use date::DateFormat;
pub use float::is_permissive_decimal;
pub use issue::ValidationIssue;
pub use validator::{validate, validate_upload, validate_with, ColumnValidator};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =====================
// Core Data Structures
// =====================

/// How often an unrecognized date-format token is reported for one rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownFormatPolicy {
    /// Once, at the first non-empty cell of the rule's column.
    #[default]
    OncePerRule,
    /// Once for every non-empty cell of the rule's column.
    PerRow,
}

impl FromStr for UnknownFormatPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once-per-rule" => Ok(Self::OncePerRule),
            "per-row" => Ok(Self::PerRow),
            other => Err(format!(
                "unknown policy '{}', expected 'once-per-rule' or 'per-row'",
                other
            )),
        }
    }
}

impl fmt::Display for UnknownFormatPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OncePerRule => f.write_str("once-per-rule"),
            Self::PerRow => f.write_str("per-row"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub unknown_format: UnknownFormatPolicy,
}

/// The outcome of one validation call: issues in detection order plus the
/// dimensions of the document that was checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
    row_count: usize,
    column_count: usize,
}

// =====================
// Traits
// =====================

/// Receives issues in the order the validator detects them.
pub trait ValidationReporter {
    fn report(&mut self, issue: ValidationIssue);
}

impl ValidationReporter for ValidationResult {
    fn report(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

impl ValidationReporter for Vec<ValidationIssue> {
    fn report(&mut self, issue: ValidationIssue) {
        self.push(issue);
    }
}

impl ValidationResult {
    pub(crate) fn with_counts(row_count: usize, column_count: usize) -> Self {
        Self {
            issues: Vec::new(),
            row_count,
            column_count,
        }
    }

    /// A result holding one call-level issue and zero counts.
    pub(crate) fn aborted(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
            row_count: 0,
            column_count: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// The human-readable error list, in detection order.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }
}
