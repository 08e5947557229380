//! Invoice Validator Error Handling
//!
//! Faults that abort an operation live here. Per-cell and per-rule findings are
//! not faults; they are accumulated as [`crate::validation::ValidationIssue`]s.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// SCHEMA STORE FAULTS
// ============================================================================

/// The rule store could not be turned into program schemas.
///
/// An absent program id is not represented here; see
/// [`crate::schema::SchemaLookup::NotFound`].
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaLoadError {
    #[error("Failed to read rule store '{}'", path.display())]
    #[diagnostic(
        code(invoice::schema::unreadable),
        help("check that the rules file exists and is readable, or pass --rules")
    )]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed rule store '{origin}': {cause}")]
    #[diagnostic(
        code(invoice::schema::malformed),
        help("each program needs a `columns` list with position, name, type, and optional required/format")
    )]
    Malformed { origin: String, cause: String },
}

impl SchemaLoadError {
    pub(crate) fn malformed(origin: impl Into<String>, cause: impl ToString) -> Self {
        Self::Malformed {
            origin: origin.into(),
            cause: cause.to_string(),
        }
    }
}

// ============================================================================
// UPLOAD INTAKE FAULTS
// ============================================================================

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("No selected file")]
    #[diagnostic(code(invoice::upload::no_file))]
    NoSelectedFile,

    #[error("File type not allowed: '{name}'")]
    #[diagnostic(
        code(invoice::upload::extension),
        help("only .csv uploads are accepted")
    )]
    DisallowedExtension { name: String },
}

// ============================================================================
// TOP-LEVEL FAULTS
// ============================================================================

/// Everything that can stop a front-end command before it produces a result.
#[derive(Debug, Error, Diagnostic)]
pub enum InvoiceError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaLoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Upload(#[from] UploadError),

    #[error("Failed to read '{}'", path.display())]
    #[diagnostic(code(invoice::io::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write error report '{}'", path.display())]
    #[diagnostic(code(invoice::report::write))]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration '{}': {cause}", path.display())]
    #[diagnostic(code(invoice::config::invalid))]
    Config { path: PathBuf, cause: String },

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(invoice::output::render))]
    Render(String),
}

pub type Result<T, E = InvoiceError> = std::result::Result<T, E>;
