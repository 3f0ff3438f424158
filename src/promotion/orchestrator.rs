//! Promotion orchestrator
//!
//! Drives one run over the schema registry's dependency order. For each
//! entity: load the latest staged batch, validate it against the parents'
//! promoted batches, clean it, and replace the promoted snapshot.
//!
//! Failure policy:
//! - every failure is captured in that entity's result
//! - a failure of a critical-path entity aborts the rest of the run
//! - cancellation is observed only between entities
//!
//! Entities run strictly in sequence: a child's foreign-key check reads its
//! parent's freshly promoted output.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use super::clean::{clean_records, DEFAULT_TRANSIENT_FIELDS};
use super::errors::PromotionError;
use super::result::{AbortInfo, PromotionResult, RunReport, SkippedEntity};
use super::state::EntityPhase;
use crate::observability::{Event, ObservationScope};
use crate::quality::{ParentRecords, RecordValidator};
use crate::schema::{EntitySchema, SchemaRegistry};
use crate::snapshot::{PromotedDocument, SnapshotStore, StagedSnapshot};

/// Which entities a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSelection {
    All,
    One(String),
}

impl RunSelection {
    /// `"all"` selects every entity; anything else names one.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("all") {
            RunSelection::All
        } else {
            RunSelection::One(value.to_string())
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skip validation entirely
    pub force: bool,
    /// Checked between entities; once set, the remaining entities are skipped
    pub cancel: Arc<AtomicBool>,
}

impl RunOptions {
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

pub struct PromotionOrchestrator<'r, S: SnapshotStore> {
    registry: &'r SchemaRegistry,
    validator: RecordValidator,
    store: S,
    transient_fields: Vec<String>,
}

impl<'r, S: SnapshotStore> PromotionOrchestrator<'r, S> {
    pub fn new(registry: &'r SchemaRegistry, validator: RecordValidator, store: S) -> Self {
        Self {
            registry,
            validator,
            store,
            transient_fields: DEFAULT_TRANSIENT_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }

    /// Replaces the fields dropped from every record during cleaning.
    pub fn with_transient_fields(mut self, fields: Vec<String>) -> Self {
        self.transient_fields = fields;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Entities covered by `selection`, in dependency order. Rejects unknown
    /// names before any store access.
    fn resolve(&self, selection: &RunSelection) -> Result<Vec<&'r EntitySchema>, PromotionError> {
        let registry = self.registry;
        match selection {
            RunSelection::All => Ok(registry.in_dependency_order().collect()),
            RunSelection::One(name) => registry
                .get(name)
                .map(|schema| vec![schema])
                .ok_or_else(|| PromotionError::UnknownEntity(name.clone())),
        }
    }

    /// Runs a promotion over `selection`.
    ///
    /// # Arguments
    ///
    /// * `selection` - `All` for every entity in dependency order, or one name
    /// * `options` - validation bypass and the cancellation flag
    ///
    /// # Errors
    ///
    /// Returns `PromotionError::UnknownEntity` before any store access when
    /// the selected name is not registered. Every per-entity failure is
    /// reported inside the run report instead.
    pub fn run(&mut self, selection: &RunSelection, options: &RunOptions) -> Result<RunReport, PromotionError> {
        let schemas = self.resolve(selection)?;
        let mut report = RunReport::begin(false);
        info!(
            event = %Event::RunBegin,
            run_id = %report.run_id,
            entities = schemas.len(),
            force = options.force,
            "promotion run started"
        );

        for (position, schema) in schemas.iter().enumerate() {
            if options.is_cancelled() {
                report.cancelled = true;
                warn!(event = %Event::RunCancelled, run_id = %report.run_id, "run cancelled");
                skip_rest(&mut report, &schemas[position..])?;
                break;
            }

            let result = self.promote_entity(schema, options.force);
            let failure = (!result.success).then(|| result.error.clone().unwrap_or_default());
            report.results.push(result);

            if let Some(reason) = failure {
                if schema.is_critical_path() {
                    warn!(
                        event = %Event::RunAborted,
                        run_id = %report.run_id,
                        entity = %schema.name,
                        reason = %reason,
                        "critical-path entity failed; aborting run"
                    );
                    report.aborted = Some(AbortInfo {
                        entity: schema.name.clone(),
                        reason,
                    });
                    skip_rest(&mut report, &schemas[position + 1..])?;
                    break;
                }
            }
        }

        report.finish();
        info!(
            event = %Event::RunComplete,
            run_id = %report.run_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped.len(),
            "promotion run finished"
        );
        Ok(report)
    }

    /// Validates `selection` without cleaning or writing anything.
    ///
    /// Parents are read from the promoted layer as they are now, so every
    /// entity is evaluated and nothing aborts.
    ///
    /// # Errors
    ///
    /// Returns `PromotionError::UnknownEntity` for an unregistered selection.
    pub fn dry_run(&self, selection: &RunSelection) -> Result<RunReport, PromotionError> {
        let schemas = self.resolve(selection)?;
        let mut report = RunReport::begin(true);

        for schema in schemas {
            let mut result = PromotionResult::new(&schema.name);
            let outcome = self
                .load_staged(schema, &mut result)
                .and_then(|staged| {
                    let parents = self.load_parents(schema)?;
                    Ok(self.validator.validate(schema, staged.records(), &parents))
                });

            match outcome {
                Ok(quality) => {
                    result.success = quality.passed;
                    result.record_count = Some(quality.record_count);
                    if !quality.passed {
                        result.record_error(&validation_failed(schema, &quality.errors));
                    }
                    result.report = Some(quality);
                }
                Err(err) => result.record_error(&err),
            }
            report.results.push(result);
        }

        report.finish();
        Ok(report)
    }

    fn promote_entity(&mut self, schema: &EntitySchema, force: bool) -> PromotionResult {
        let scope = ObservationScope::new("PROMOTE", &schema.name);
        let mut result = PromotionResult::new(&schema.name);
        let mut phase = EntityPhase::Pending;

        match self.drive(schema, force, &mut phase, &mut result) {
            Ok(()) => {
                info!(
                    event = %Event::EntityComplete,
                    entity = %schema.name,
                    records = result.record_count.unwrap_or_default(),
                    checksum = result.checksum.as_deref().unwrap_or_default(),
                    "entity promoted"
                );
                scope.complete();
            }
            Err(err) => {
                phase = phase.fail().unwrap_or(phase);
                warn!(
                    event = %Event::EntityFailed,
                    entity = %schema.name,
                    error_kind = %err.kind(),
                    error = %err,
                    "entity not promoted"
                );
                scope.fail(&err.to_string());
                result.record_error(&err);
            }
        }

        result.phase = phase;
        result
    }

    /// Load, validate, clean, write. Advances `phase` as each stage starts.
    fn drive(
        &mut self,
        schema: &EntitySchema,
        force: bool,
        phase: &mut EntityPhase,
        result: &mut PromotionResult,
    ) -> Result<(), PromotionError> {
        let staged = self.load_staged(schema, result)?;

        *phase = phase.begin_validation()?;
        if force {
            info!(event = %Event::ValidationBypassed, entity = %schema.name, "validation skipped");
        } else {
            let parents = self.load_parents(schema)?;
            let quality = self.validator.validate(schema, staged.records(), &parents);
            let passed = quality.passed;
            let failure = (!passed).then(|| validation_failed(schema, &quality.errors));
            let event = if passed {
                Event::ValidationPassed
            } else {
                Event::ValidationFailed
            };
            info!(
                event = %event,
                entity = %schema.name,
                records = quality.record_count,
                errors = quality.errors.len(),
                warnings = quality.warnings.len(),
                "validation finished"
            );
            result.report = Some(quality);
            if let Some(err) = failure {
                return Err(err);
            }
        }

        *phase = phase.begin_cleaning()?;
        let cleaned = clean_records(staged.records(), &schema.id_field, &self.transient_fields);
        let document = PromotedDocument::from_staged(&staged.document.metadata, cleaned, Utc::now());

        *phase = phase.begin_writing()?;
        let receipt = self.store.write_promoted(&schema.name, &document)?;
        info!(
            event = %Event::PromotedWrite,
            entity = %schema.name,
            location = %receipt.location,
            "promoted snapshot replaced"
        );

        *phase = phase.succeed()?;
        result.record_write(receipt, document.metadata.record_count);
        Ok(())
    }

    fn load_staged(
        &self,
        schema: &EntitySchema,
        result: &mut PromotionResult,
    ) -> Result<StagedSnapshot, PromotionError> {
        info!(event = %Event::EntityBegin, entity = %schema.name, "loading staged snapshot");
        let staged = match self.store.latest_staged(&schema.name)? {
            Some(staged) => staged,
            None => {
                warn!(event = %Event::NoStagedData, entity = %schema.name, "no staged snapshot");
                return Err(PromotionError::NoStagedData(schema.name.clone()));
            }
        };
        result.staged_path = Some(staged.location.clone());
        Ok(staged)
    }

    /// Promoted batches of every parent entity. A parent without a promoted
    /// snapshot contributes an empty batch.
    fn load_parents(&self, schema: &EntitySchema) -> Result<ParentRecords, PromotionError> {
        let mut parents = ParentRecords::new();
        for parent in schema.parent_entities() {
            let records = match self.store.latest_promoted(parent)? {
                Some(snapshot) => snapshot.document.data,
                None => {
                    warn!(
                        event = %Event::ParentMissing,
                        entity = %schema.name,
                        parent,
                        "parent has no promoted snapshot"
                    );
                    Vec::new()
                }
            };
            parents.insert(parent.to_string(), records);
        }
        Ok(parents)
    }
}

fn validation_failed(schema: &EntitySchema, errors: &[String]) -> PromotionError {
    PromotionError::ValidationFailed {
        entity: schema.name.clone(),
        summary: errors.join("; "),
    }
}

/// Moves every entity in `rest` from `Pending` to `Aborted` and records it
/// as skipped.
fn skip_rest(report: &mut RunReport, rest: &[&EntitySchema]) -> Result<(), PromotionError> {
    for schema in rest {
        let phase = EntityPhase::Pending.abort()?;
        info!(
            event = %Event::EntitySkipped,
            entity = %schema.name,
            phase = phase.name(),
            "entity not attempted"
        );
        report.skipped.push(SkippedEntity {
            entity_name: schema.name.clone(),
            phase,
        });
    }
    Ok(())
}
