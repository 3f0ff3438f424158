//! Pipeline configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object is
//! a valid configuration. Validated on load.
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "thresholds": {"max_null_percentage": 5.0, "max_duplicate_percentage": 1.0},
//!   "transient_fields": ["extracted_at"],
//!   "schema_catalog": null
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::promotion::DEFAULT_TRANSIENT_FIELDS;
use crate::quality::QualityThresholds;
use crate::schema::{SchemaLoader, SchemaRegistry, SchemaResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root holding `qa/` and `prod/`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub thresholds: QualityThresholds,

    /// Fields dropped from every record during cleaning
    #[serde(default = "default_transient_fields")]
    pub transient_fields: Vec<String>,

    /// JSON schema catalog replacing the built-in one
    #[serde(default)]
    pub schema_catalog: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_transient_fields() -> Vec<String> {
    DEFAULT_TRANSIENT_FIELDS
        .iter()
        .map(|f| f.to_string())
        .collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            thresholds: QualityThresholds::default(),
            transient_fields: default_transient_fields(),
            schema_catalog: None,
        }
    }
}

impl PipelineConfig {
    /// Reads and validates a config file.
    ///
    /// # Arguments
    ///
    /// * `path` - JSON config file; omitted keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` or `ConfigError::Parse` for an unreadable
    /// or malformed file and `ConfigError::Invalid` when a value is out of
    /// range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides the data directory.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }
        check_percentage("max_null_percentage", self.thresholds.max_null_percentage)?;
        check_percentage(
            "max_duplicate_percentage",
            self.thresholds.max_duplicate_percentage,
        )?;
        if self.transient_fields.iter().any(|f| f.is_empty()) {
            return Err(ConfigError::Invalid(
                "transient_fields must not contain empty names".into(),
            ));
        }
        Ok(())
    }

    /// Builds the schema registry: the configured catalog, or the built-in one.
    pub fn registry(&self) -> SchemaResult<SchemaRegistry> {
        match &self.schema_catalog {
            Some(path) => SchemaLoader::new(path).load(),
            None => SchemaRegistry::builtin(),
        }
    }
}

fn check_percentage(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be within 0..=100, got {}",
            name, value
        )))
    }
}
