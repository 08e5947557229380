//! Schema-driven validation of CSV invoice uploads.
//!
//! A program id selects a [`ProgramSchema`] from a [`SchemaSource`]; the
//! [`Document`] is checked rule by rule and the findings come back as an
//! ordered [`ValidationResult`], which can be exported as an error report.

pub use crate::document::{Document, DocumentError};
pub use crate::errors::{InvoiceError, SchemaLoadError, UploadError};
pub use crate::schema::{ColumnRule, ColumnType, ProgramSchema, SchemaLookup, SchemaSource};
pub use crate::validation::{
    validate, validate_upload, ValidationIssue, ValidationOptions, ValidationResult,
};

pub mod cli;
pub mod config;
pub mod document;
pub mod errors;
pub mod report;
pub mod schema;
pub mod test_harness;
pub mod upload;
pub mod validation;
