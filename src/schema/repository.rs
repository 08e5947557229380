//! Rule stores that resolve program ids to [`ProgramSchema`]s.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{ProgramSchema, SchemaLookup};
use crate::errors::SchemaLoadError;

/// A keyed collection of program schemas.
///
/// Implementations are read-only from the validator's point of view and may be
/// shared between concurrent validation calls.
pub trait SchemaSource: Send + Sync {
    /// Resolves `program_id`. An unknown id yields [`SchemaLookup::NotFound`].
    fn get_schema(&self, program_id: &str) -> Result<SchemaLookup, SchemaLoadError>;

    /// All program ids known to the store, sorted.
    fn program_ids(&self) -> Result<Vec<String>, SchemaLoadError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Yaml,
}

impl StoreFormat {
    /// Picks the format from a file extension; anything but `.yaml`/`.yml` is JSON.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

type ProgramMap = BTreeMap<String, ProgramSchema>;

/// Parses a whole rule store and stamps each schema with its program id.
pub fn parse_rule_store(
    text: &str,
    format: StoreFormat,
    origin: &str,
) -> Result<ProgramMap, SchemaLoadError> {
    let mut programs: ProgramMap = match format {
        StoreFormat::Json => serde_json::from_str(text)
            .map_err(|e| SchemaLoadError::malformed(origin, e))?,
        StoreFormat::Yaml => serde_yaml::from_str(text)
            .map_err(|e| SchemaLoadError::malformed(origin, e))?,
    };
    for (id, schema) in programs.iter_mut() {
        if let Some(rule) = schema.columns.iter().find(|rule| rule.position == usize::MAX) {
            return Err(SchemaLoadError::malformed(
                origin,
                format!(
                    "program '{}': position {} of column '{}' is out of range",
                    id, rule.position, rule.name
                ),
            ));
        }
        schema.program_id = id.clone();
    }
    Ok(programs)
}

fn lookup(programs: &ProgramMap, program_id: &str) -> SchemaLookup {
    match programs.get(program_id) {
        Some(schema) => SchemaLookup::Found(schema.clone()),
        None => SchemaLookup::NotFound {
            program_id: program_id.to_string(),
        },
    }
}

// ============================================================================
// FILE-BACKED STORE
// ============================================================================

/// A rule store on disk, re-read in full on every lookup.
#[derive(Debug, Clone)]
pub struct FileSchemaSource {
    path: PathBuf,
}

impl FileSchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ProgramMap, SchemaLoadError> {
        let text = fs::read_to_string(&self.path).map_err(|source| {
            warn!(path = %self.path.display(), error = %source, "rule store unreadable");
            SchemaLoadError::Unreadable {
                path: self.path.clone(),
                source,
            }
        })?;
        let origin = self.path.display().to_string();
        let programs = parse_rule_store(&text, StoreFormat::for_path(&self.path), &origin)
            .inspect_err(|e| warn!(error = %e, "rule store malformed"))?;
        debug!(path = %origin, programs = programs.len(), "loaded rule store");
        Ok(programs)
    }
}

impl SchemaSource for FileSchemaSource {
    fn get_schema(&self, program_id: &str) -> Result<SchemaLookup, SchemaLoadError> {
        Ok(lookup(&self.load()?, program_id))
    }

    fn program_ids(&self) -> Result<Vec<String>, SchemaLoadError> {
        Ok(self.load()?.into_keys().collect())
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// A rule store held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchemaSource {
    programs: ProgramMap,
}

impl InMemorySchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaLoadError> {
        Ok(Self {
            programs: parse_rule_store(text, StoreFormat::Json, "<inline json>")?,
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaLoadError> {
        Ok(Self {
            programs: parse_rule_store(text, StoreFormat::Yaml, "<inline yaml>")?,
        })
    }

    pub fn insert(&mut self, schema: ProgramSchema) {
        self.programs.insert(schema.program_id.clone(), schema);
    }

    pub fn with_schema(mut self, schema: ProgramSchema) -> Self {
        self.insert(schema);
        self
    }
}

impl SchemaSource for InMemorySchemaSource {
    fn get_schema(&self, program_id: &str) -> Result<SchemaLookup, SchemaLoadError> {
        Ok(lookup(&self.programs, program_id))
    }

    fn program_ids(&self) -> Result<Vec<String>, SchemaLoadError> {
        Ok(self.programs.keys().cloned().collect())
    }
}
