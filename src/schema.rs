//! Program schemas: the per-program column rules an upload is checked against.
//!
//! A rule store maps program ids to `{ "columns": [ ... ] }`. Rules are kept in
//! the order they appear in the store; that order drives the order of the
//! reported errors.

pub mod repository;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use repository::{FileSchemaSource, InMemorySchemaSource, SchemaSource};

// ============================================================================
// CORE TYPES
// ============================================================================

/// The declared content type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Float,
    Date,
    String,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Date => "date",
            Self::String => "string",
        };
        f.write_str(name)
    }
}

/// One schema entry describing the expected content at a fixed column position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    /// Zero-based index into each row.
    pub position: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub required: bool,
    /// Date pattern token; only consulted when `column_type` is `Date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ColumnRule {
    pub fn new(position: usize, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            position,
            name: name.into(),
            column_type,
            required: false,
            format: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// The 1-based column label used in messages.
    pub fn column_label(&self) -> usize {
        self.position.saturating_add(1)
    }
}

/// The validation rules for a single program, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSchema {
    #[serde(skip)]
    pub program_id: String,
    pub columns: Vec<ColumnRule>,
}

impl ProgramSchema {
    pub fn new(program_id: impl Into<String>, columns: Vec<ColumnRule>) -> Self {
        Self {
            program_id: program_id.into(),
            columns,
        }
    }
}

/// Outcome of looking a program up in a rule store.
///
/// An unknown program id is an ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLookup {
    Found(ProgramSchema),
    NotFound { program_id: String },
}

impl SchemaLookup {
    pub fn into_schema(self) -> Option<ProgramSchema> {
        match self {
            Self::Found(schema) => Some(schema),
            Self::NotFound { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_defaults_required_to_false() {
        let rule: ColumnRule =
            serde_json::from_str(r#"{"position": 2, "name": "Total", "type": "float"}"#).unwrap();
        assert_eq!(rule, ColumnRule::new(2, "Total", ColumnType::Float));
        assert_eq!(rule.column_label(), 3);
    }

    #[test]
    fn rule_keeps_date_format_token_verbatim() {
        let rule: ColumnRule = serde_json::from_str(
            r#"{"position": 0, "name": "Issued", "type": "date", "required": true, "format": "YYYY-MM-DD"}"#,
        )
        .unwrap();
        assert!(rule.required);
        assert_eq!(rule.format.as_deref(), Some("YYYY-MM-DD"));
    }

    #[test]
    fn negative_position_is_rejected() {
        let parsed = serde_json::from_str::<ColumnRule>(
            r#"{"position": -1, "name": "Bad", "type": "string"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let parsed = serde_json::from_str::<ColumnRule>(
            r#"{"position": 0, "name": "Bad", "type": "integer"}"#,
        );
        assert!(parsed.is_err());
    }
}
