//! Command implementations
//!
//! Each command builds its collaborators from the resolved configuration,
//! runs, and returns the document the CLI prints.

use serde::Serialize;
use tracing::info;

use super::args::Cli;
use super::errors::CliResult;
use crate::config::PipelineConfig;
use crate::observability::Event;
use crate::promotion::{PromotionOrchestrator, RunOptions, RunReport, RunSelection};
use crate::quality::RecordValidator;
use crate::schema::{EntitySchema, SchemaRegistry};
use crate::snapshot::FsSnapshotStore;

/// `schema` output: every entity in dependency order.
#[derive(Debug, Serialize)]
pub struct SchemaListing<'r> {
    pub dependency_order: &'r [String],
    pub entities: Vec<&'r EntitySchema>,
}

/// Resolves the configuration: the file named by `--config` if any, else
/// defaults, then the `--data-dir` override.
pub fn load_config(cli: &Cli) -> CliResult<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir.clone());
        config.validate()?;
    }
    info!(
        event = %Event::ConfigLoaded,
        data_dir = %config.data_dir.display(),
        "configuration resolved"
    );
    Ok(config)
}

fn load_registry(config: &PipelineConfig) -> CliResult<SchemaRegistry> {
    let registry = config.registry()?;
    info!(
        event = %Event::SchemasLoaded,
        entities = registry.len(),
        order = %registry.dependency_order().join(" -> "),
        "schema registry ready"
    );
    Ok(registry)
}

/// Promotes the selected entities.
pub fn promote(config: &PipelineConfig, entity: &str, force: bool) -> CliResult<RunReport> {
    let registry = load_registry(config)?;
    let store = FsSnapshotStore::new(&config.data_dir);
    let mut orchestrator =
        PromotionOrchestrator::new(&registry, RecordValidator::new(config.thresholds), store)
            .with_transient_fields(config.transient_fields.clone());

    let options = RunOptions {
        force,
        ..RunOptions::default()
    };
    Ok(orchestrator.run(&RunSelection::parse(entity), &options)?)
}

/// Validates the selected entities; writes nothing.
pub fn validate(config: &PipelineConfig, entity: &str) -> CliResult<RunReport> {
    let registry = load_registry(config)?;
    let store = FsSnapshotStore::new(&config.data_dir);
    let orchestrator =
        PromotionOrchestrator::new(&registry, RecordValidator::new(config.thresholds), store);
    Ok(orchestrator.dry_run(&RunSelection::parse(entity))?)
}

/// Loads the registry and hands it to `f` for rendering.
pub fn with_schema_listing<T>(
    config: &PipelineConfig,
    f: impl FnOnce(&SchemaListing<'_>) -> CliResult<T>,
) -> CliResult<T> {
    let registry = load_registry(config)?;
    let listing = SchemaListing {
        dependency_order: registry.dependency_order(),
        entities: registry.in_dependency_order().collect(),
    };
    f(&listing)
}
