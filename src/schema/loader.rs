//! Schema catalog loader
//!
//! A catalog is either:
//! - a single JSON file holding an array of entity schemas (declaration order
//!   is array order), or
//! - a directory with one entity schema per `*.json` file (declaration order
//!   is file-name order).
//!
//! Missing or malformed catalogs are errors; nothing falls back to the
//! built-in catalog silently.

use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::registry::SchemaRegistry;
use super::types::EntitySchema;

/// Reads schema catalogs from disk.
pub struct SchemaLoader {
    path: PathBuf,
}

impl SchemaLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every schema and builds the registry.
    ///
    /// A file holds a JSON array of schemas. A directory holds one schema per
    /// `*.json` file, read in file-name order; other files are ignored.
    ///
    /// # Errors
    ///
    /// Returns `LAKE_SCHEMA_MALFORMED` if a file cannot be read or parsed,
    /// and any error `SchemaRegistry::new` raises for the loaded set.
    pub fn load(&self) -> SchemaResult<SchemaRegistry> {
        let schemas = if self.path.is_dir() {
            self.load_dir()?
        } else {
            self.load_file()?
        };
        SchemaRegistry::new(schemas)
    }

    fn load_file(&self) -> SchemaResult<Vec<EntitySchema>> {
        let content = read(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|e| SchemaError::malformed(display(&self.path), format!("Invalid JSON: {}", e)))
    }

    fn load_dir(&self) -> SchemaResult<Vec<EntitySchema>> {
        let entries = fs::read_dir(&self.path).map_err(|e| {
            SchemaError::malformed(
                display(&self.path),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(
                    display(&self.path),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        files
            .iter()
            .map(|path| {
                let content = read(path)?;
                serde_json::from_str::<EntitySchema>(&content).map_err(|e| {
                    SchemaError::malformed(display(path), format!("Invalid JSON: {}", e))
                })
            })
            .collect()
    }
}

fn read(path: &Path) -> SchemaResult<String> {
    fs::read_to_string(path)
        .map_err(|e| SchemaError::malformed(display(path), format!("Failed to read file: {}", e)))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
