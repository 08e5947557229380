//! Runtime configuration for the validator front end.
//!
//! Defaults can be overridden by a YAML file (`--config`) and then by
//! command-line flags. Every key is optional:
//!
//! ```yaml
//! rules_path: config/rules.json
//! report_dir: out/reports
//! unknown_format: per-row        # or once-per-rule
//! allowed_extensions: [csv]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{InvoiceError, Result};
use crate::schema::FileSchemaSource;
use crate::upload::DEFAULT_EXTENSIONS;
use crate::validation::{UnknownFormatPolicy, ValidationOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    pub rules_path: PathBuf,
    pub report_dir: PathBuf,
    pub unknown_format: UnknownFormatPolicy,
    pub allowed_extensions: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("rules.json"),
            report_dir: PathBuf::from("reports"),
            unknown_format: UnknownFormatPolicy::default(),
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

impl ValidatorConfig {
    /// Reads a YAML configuration file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| InvoiceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|cause| InvoiceError::Config {
            path: path.to_path_buf(),
            cause,
        })
    }

    pub fn from_yaml_str(text: &str) -> std::result::Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }

    pub fn options(&self) -> ValidationOptions {
        ValidationOptions {
            unknown_format: self.unknown_format,
        }
    }

    pub fn schema_source(&self) -> FileSchemaSource {
        FileSchemaSource::new(&self.rules_path)
    }
}
