//! Quality report
//!
//! Structured outcome of validating one staged batch. `passed` is false iff
//! at least one critical check failed; warning failures are recorded and
//! summarized but never change `passed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::checks::CheckOutcome;
use crate::schema::CheckSeverity;

/// One itemized check in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub severity: CheckSeverity,
    pub details: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub entity_name: String,
    pub timestamp: DateTime<Utc>,
    pub record_count: usize,
    pub passed: bool,
    pub checks: Vec<CheckResult>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl QualityReport {
    /// Empty, passing report for a batch of `record_count` records.
    pub fn new(entity_name: impl Into<String>, record_count: usize) -> Self {
        Self {
            entity_name: entity_name.into(),
            timestamp: Utc::now(),
            record_count,
            passed: true,
            checks: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Appends a check. A failed critical check fails the report and adds its
    /// message to `errors`; a failed warning check adds to `warnings`.
    pub fn add_check(&mut self, name: impl Into<String>, severity: CheckSeverity, outcome: CheckOutcome) {
        if !outcome.passed {
            match severity {
                CheckSeverity::Critical => {
                    self.passed = false;
                    self.errors.push(outcome.message);
                }
                CheckSeverity::Warning => self.warnings.push(outcome.message),
            }
        }
        self.checks.push(CheckResult {
            name: name.into(),
            passed: outcome.passed,
            severity,
            details: outcome.details,
        });
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Names of failed checks with the given severity.
    pub fn failed_checks(&self, severity: CheckSeverity) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.passed && c.severity == severity)
            .map(|c| c.name.as_str())
            .collect()
    }
}
