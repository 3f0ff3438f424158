//! Promotion outcomes
//!
//! One `PromotionResult` per entity attempted, collected into a `RunReport`
//! for the whole run. Both are plain data and serialize to the JSON the CLI
//! prints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::{ErrorKind, PromotionError};
use super::state::EntityPhase;
use crate::quality::QualityReport;
use crate::snapshot::WriteReceipt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionResult {
    pub entity_name: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub phase: EntityPhase,
    pub staged_path: Option<String>,
    pub promoted_path: Option<String>,
    pub report: Option<QualityReport>,
    pub record_count: Option<usize>,
    pub checksum: Option<String>,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl PromotionResult {
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            timestamp: Utc::now(),
            success: false,
            phase: EntityPhase::Pending,
            staged_path: None,
            promoted_path: None,
            report: None,
            record_count: None,
            checksum: None,
            error: None,
            error_kind: None,
        }
    }

    pub(crate) fn record_write(&mut self, receipt: WriteReceipt, record_count: usize) {
        self.success = true;
        self.promoted_path = Some(receipt.location);
        self.checksum = Some(receipt.checksum);
        self.record_count = Some(record_count);
    }

    pub(crate) fn record_error(&mut self, error: &PromotionError) {
        self.success = false;
        self.error = Some(error.to_string());
        self.error_kind = Some(error.kind());
    }
}

/// Why a run stopped before its last entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbortInfo {
    pub entity: String,
    pub reason: String,
}

/// An entity the run stopped before reaching. Its phase is always
/// `Aborted`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntity {
    pub entity_name: String,
    pub phase: EntityPhase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub results: Vec<PromotionResult>,
    pub aborted: Option<AbortInfo>,
    pub cancelled: bool,
    /// Entities never attempted, in dependency order
    pub skipped: Vec<SkippedEntity>,
}

impl RunReport {
    pub fn begin(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            dry_run,
            results: Vec::new(),
            aborted: None,
            cancelled: false,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// True iff every attempted entity succeeded and the run was neither
    /// aborted nor cancelled.
    pub fn success(&self) -> bool {
        self.aborted.is_none() && !self.cancelled && self.results.iter().all(|r| r.success)
    }

    pub fn result(&self, entity: &str) -> Option<&PromotionResult> {
        self.results.iter().find(|r| r.entity_name == entity)
    }

    /// Names of the skipped entities, in dependency order.
    pub fn skipped_entities(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.entity_name.as_str()).collect()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}
