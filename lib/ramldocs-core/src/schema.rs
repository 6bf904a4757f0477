//! Deep-merging of externally referenced JSON Schema documents.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AggregationError;
use crate::tree::Include;

/// Merges the JSON Schema documents referenced by colliding fragments into a
/// single schema file.
///
/// All references are resolved relative to one base directory (the output
/// directory of an aggregation run, where the schema files have already been
/// copied); the merged document is written there as well.
#[derive(Debug, Clone)]
pub struct JsonSchemaMerger {
    directory: PathBuf,
}

impl JsonSchemaMerger {
    /// Creates a merger resolving references inside `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Merges the referenced schemas into one document.
    ///
    /// Zero references produce `None`; a single reference is returned
    /// unchanged without touching the filesystem. For more references the
    /// documents are folded left-to-right: object keys overwrite or add,
    /// nested objects merge key-by-key, and arrays (such as `required`) are
    /// unioned with duplicates removed in first-seen order. The result is
    /// persisted next to its inputs under the lexicographically-first
    /// location with `.json` replaced by `-merged.json`.
    pub fn merge_schemas(
        &self,
        schemas: &[Include],
    ) -> Result<Option<Include>, AggregationError> {
        match schemas {
            [] => Ok(None),
            [single] => Ok(Some(single.clone())),
            _ => {
                let target = merged_target(schemas);
                let mut merged = serde_json::Value::Object(serde_json::Map::new());
                for include in schemas {
                    merge_into(&mut merged, self.read_schema(include)?);
                }
                let path = self.directory.join(target.location());
                let text = serde_json::to_string_pretty(&merged)?;
                fs::write(&path, text)
                    .map_err(|source| AggregationError::io(&path, source))?;
                debug!(merged = target.location(), inputs = schemas.len(), "merged schemas");
                Ok(Some(target))
            }
        }
    }

    fn read_schema(&self, include: &Include) -> Result<serde_json::Value, AggregationError> {
        let path = self.directory.join(include.location());
        if !path.is_file() {
            return Err(AggregationError::SchemaNotFound {
                location: include.location().to_owned(),
            });
        }
        let text =
            fs::read_to_string(&path).map_err(|source| AggregationError::io(&path, source))?;
        serde_json::from_str(&text).map_err(|source| AggregationError::SchemaParse {
            location: include.location().to_owned(),
            source,
        })
    }

    /// The directory references are resolved in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

fn merged_target(schemas: &[Include]) -> Include {
    let mut locations: Vec<&str> = schemas.iter().map(Include::location).collect();
    locations.sort_unstable();
    // the first location only names the output; fold order stays as given
    Include::new(locations[0].replace(".json", "-merged.json"))
}

fn merge_into(accumulator: &mut serde_json::Value, incoming: serde_json::Value) {
    use serde_json::Value;
    match (accumulator, incoming) {
        (Value::Object(accumulated), Value::Object(entries)) => {
            for (key, value) in entries {
                match accumulated.get_mut(&key) {
                    Some(slot) => merge_into(slot, value),
                    None => {
                        accumulated.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(accumulated), Value::Array(items)) => {
            for item in items {
                if !accumulated.contains(&item) {
                    accumulated.push(item);
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
