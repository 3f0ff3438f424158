//! Independent quality checks
//!
//! Every check takes a batch and returns a [`CheckOutcome`]. Checks never
//! mutate the batch, never short-circuit on the first bad record, and never
//! know their own severity; the validator assigns severity from the schema.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashSet;

use super::dates::ParsedDate;
use crate::record::{present, IdKey, Record};
use crate::schema::{EnumConstraint, ForeignKey, RangeConstraint};

/// Maximum number of offending entries carried in check details.
pub const SAMPLE_LIMIT: usize = 5;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("email pattern is a valid regex")
});

/// Result of one check over one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub details: Value,
    /// Human-readable summary, meaningful when the check failed
    pub message: String,
}

impl CheckOutcome {
    fn new(passed: bool, details: Value, message: String) -> Self {
        Self {
            passed,
            details,
            message,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// A record fails when any listed field is absent or null.
pub fn required_fields(records: &[Record], fields: &[String]) -> CheckOutcome {
    let mut affected = 0usize;
    let mut samples = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let missing: Vec<&str> = fields
            .iter()
            .filter(|f| present(record, f).is_none())
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            affected += 1;
            if samples.len() < SAMPLE_LIMIT {
                samples.push(json!({"record_index": index, "missing_fields": missing}));
            }
        }
    }

    CheckOutcome::new(
        affected == 0,
        json!({
            "required_fields": fields,
            "records_with_missing": affected,
            "sample_issues": samples,
        }),
        format!("Missing required fields in {} records", affected),
    )
}

/// Ratio of blank slots over every (record, field) pair the batch carries.
pub fn null_percentage(records: &[Record], max_pct: f64) -> CheckOutcome {
    let total: usize = records.iter().map(|r| r.len()).sum();
    let blank: usize = records
        .iter()
        .map(|r| r.values().filter(|v| v.is_blank()).count())
        .sum();
    let pct = percentage(blank, total);

    CheckOutcome::new(
        pct <= max_pct,
        json!({
            "null_percentage": round2(pct),
            "threshold": max_pct,
            "total_fields": total,
            "null_fields": blank,
        }),
        format!("Null percentage ({}%) exceeds threshold", round2(pct)),
    )
}

/// Ratio of repeated id values among the ids present in the batch. Ids are
/// compared as they will be promoted, with surrounding whitespace trimmed.
pub fn duplicates(records: &[Record], id_field: &str, max_pct: f64) -> CheckOutcome {
    let ids: Vec<IdKey> = records
        .iter()
        .filter_map(|r| r.get(id_field).and_then(|v| v.id_key()))
        .collect();
    let distinct: HashSet<&IdKey> = ids.iter().collect();
    let duplicate_count = ids.len() - distinct.len();
    let pct = percentage(duplicate_count, ids.len());

    CheckOutcome::new(
        pct <= max_pct,
        json!({
            "duplicate_count": duplicate_count,
            "duplicate_percentage": round2(pct),
            "threshold": max_pct,
            "total_records": records.len(),
        }),
        format!("Found {} duplicate records", duplicate_count),
    )
}

/// Present, non-empty values must look like `local@domain.tld`.
pub fn email_format(records: &[Record], field: &str) -> CheckOutcome {
    let mut invalid = 0usize;
    let mut samples = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let value = match present(record, field) {
            Some(v) if !v.is_blank() => v,
            _ => continue,
        };
        let valid = value
            .as_str()
            .map_or(false, |email| EMAIL_PATTERN.is_match(email));
        if !valid {
            invalid += 1;
            if samples.len() < SAMPLE_LIMIT {
                samples.push(json!({"index": index, "email": value.to_json()}));
            }
        }
    }

    CheckOutcome::new(
        invalid == 0,
        json!({
            "field": field,
            "invalid_count": invalid,
            "sample_invalid": samples,
        }),
        format!("Found {} invalid email formats in {}", invalid, field),
    )
}

/// Present values must be one of the allowed values. Absence is tolerated.
pub fn enum_membership(records: &[Record], constraint: &EnumConstraint) -> CheckOutcome {
    let mut invalid = 0usize;
    let mut samples = Vec::new();

    for (index, record) in records.iter().enumerate() {
        if let Some(value) = present(record, &constraint.field) {
            if !constraint.allowed.contains(&value.to_string()) {
                invalid += 1;
                if samples.len() < SAMPLE_LIMIT {
                    samples.push(json!({"index": index, "value": value.to_json()}));
                }
            }
        }
    }

    CheckOutcome::new(
        invalid == 0,
        json!({
            "field": constraint.field,
            "allowed_values": constraint.allowed,
            "invalid_count": invalid,
            "sample_invalid": samples,
        }),
        format!(
            "Found {} records with invalid {} values",
            invalid, constraint.field
        ),
    )
}

/// Present values must be numeric and within the inclusive bounds.
pub fn numeric_range(records: &[Record], constraint: &RangeConstraint) -> CheckOutcome {
    let mut invalid = 0usize;
    let mut samples = Vec::new();

    for (index, record) in records.iter().enumerate() {
        if let Some(value) = present(record, &constraint.field) {
            let in_range = value.as_f64().map_or(false, |n| {
                constraint.min.map_or(true, |min| n >= min)
                    && constraint.max.map_or(true, |max| n <= max)
            });
            if !in_range {
                invalid += 1;
                if samples.len() < SAMPLE_LIMIT {
                    samples.push(json!({"index": index, "value": value.to_json()}));
                }
            }
        }
    }

    CheckOutcome::new(
        invalid == 0,
        json!({
            "field": constraint.field,
            "min": constraint.min,
            "max": constraint.max,
            "invalid_count": invalid,
            "sample_invalid": samples,
        }),
        format!(
            "Found {} records with {} out of range",
            invalid, constraint.field
        ),
    )
}

/// Dates among `fields` must be non-decreasing in list order.
///
/// Only present values take part. Adjacent pairs are compared when both
/// parsed; malformed values are counted but never fail the record. A record
/// stops at its first violated pair.
pub fn date_sequence(records: &[Record], fields: &[String]) -> CheckOutcome {
    let mut violations = 0usize;
    let mut malformed = 0usize;
    let mut samples = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let parsed: Vec<(&str, ParsedDate)> = fields
            .iter()
            .filter_map(|f| present(record, f).map(|v| (f.as_str(), ParsedDate::parse(v))))
            .collect();
        malformed += parsed
            .iter()
            .filter(|(_, p)| *p == ParsedDate::Malformed)
            .count();

        let violated = parsed.windows(2).find(|pair| {
            match (pair[0].1.value(), pair[1].1.value()) {
                (Some(earlier), Some(later)) => earlier > later,
                _ => false,
            }
        });

        if let Some(pair) = violated {
            violations += 1;
            if samples.len() < SAMPLE_LIMIT {
                samples.push(json!({
                    "index": index,
                    "earlier_field": pair[0].0,
                    "later_field": pair[1].0,
                }));
            }
        }
    }

    CheckOutcome::new(
        violations == 0,
        json!({
            "fields": fields,
            "violation_count": violations,
            "malformed_count": malformed,
            "sample_violations": samples,
        }),
        format!("Found {} records with out-of-order dates", violations),
    )
}

/// Every present, non-null foreign-key value must equal a parent id exactly.
pub fn foreign_key(
    records: &[Record],
    fk: &ForeignKey,
    parent_records: &[Record],
) -> CheckOutcome {
    let parent_ids: HashSet<IdKey> = parent_records
        .iter()
        .filter_map(|r| r.get(&fk.parent_id_field).and_then(|v| v.id_key()))
        .collect();

    let mut orphaned = 0usize;
    let mut samples = Vec::new();

    for (index, record) in records.iter().enumerate() {
        if let Some(value) = present(record, &fk.field) {
            let found = value
                .id_key()
                .map_or(false, |key| parent_ids.contains(&key));
            if !found {
                orphaned += 1;
                if samples.len() < SAMPLE_LIMIT {
                    samples.push(json!({"index": index, "value": value.to_json()}));
                }
            }
        }
    }

    CheckOutcome::new(
        orphaned == 0,
        json!({
            "field": fk.field,
            "parent_entity": fk.parent_entity,
            "parent_id_field": fk.parent_id_field,
            "parent_record_count": parent_records.len(),
            "orphaned_count": orphaned,
            "sample_orphans": samples,
        }),
        format!(
            "Found {} records with orphaned {} references to {}",
            orphaned, fk.field, fk.parent_entity
        ),
    )
}
