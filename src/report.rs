//! Downloadable error reports: one error message per row under an `Error`
//! header, named after the upload they describe.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{InvoiceError, Result};
use crate::upload::secure_filename;

pub const REPORT_HEADER: &str = "Error";
const REPORT_PREFIX: &str = "ErrorReport_";
const FALLBACK_BASE: &str = "upload";

/// `ErrorReport_<base>.csv`, where `<base>` is the sanitized name without its
/// extension.
pub fn report_name(source_name: &str) -> String {
    let sanitized = secure_filename(source_name);
    let base = match sanitized.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => sanitized.as_str(),
    };
    let base = if base.is_empty() { FALLBACK_BASE } else { base };
    format!("{}{}.csv", REPORT_PREFIX, base)
}

/// A rendered, not yet written, error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    name: String,
    body: String,
}

impl ErrorReport {
    pub fn build<S: AsRef<str>>(errors: &[S], source_name: &str) -> Result<Self> {
        Ok(Self {
            name: report_name(source_name),
            body: render(errors)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Writes the report into `dir`, creating it if needed, and returns its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.name);
        fs::create_dir_all(dir).map_err(|source| InvoiceError::ReportWrite {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, &self.body).map_err(|source| InvoiceError::ReportWrite {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote error report");
        Ok(path)
    }
}

/// Serializes the messages as a single-column CSV table.
pub fn render<S: AsRef<str>>(errors: &[S]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([REPORT_HEADER])
        .map_err(|e| InvoiceError::Render(e.to_string()))?;
    for error in errors {
        writer
            .write_record([error.as_ref()])
            .map_err(|e| InvoiceError::Render(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| InvoiceError::Render(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| InvoiceError::Render(e.to_string()))
}

/// Renders and writes a report for `errors`; returns the written path.
pub fn export<S: AsRef<str>>(errors: &[S], source_name: &str, dir: &Path) -> Result<PathBuf> {
    ErrorReport::build(errors, source_name)?.write_to(dir)
}
