//! Schema-driven batch validation
//!
//! Runs every check an entity's schema configures, in a fixed order, and
//! assembles a [`QualityReport`]. All configured checks always run so the
//! report is complete even when an early check fails.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::checks::{self, CheckOutcome};
use super::report::QualityReport;
use crate::record::Record;
use crate::schema::{
    email_check, enum_check, foreign_key_check, range_check, EntitySchema, DATE_SEQUENCE,
    DUPLICATES, NULL_PERCENTAGE, REQUIRED_FIELDS,
};

/// Promoted parent batches keyed by entity name.
pub type ParentRecords = HashMap<String, Vec<Record>>;

/// Ratio thresholds, as percentages in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub max_null_percentage: f64,
    pub max_duplicate_percentage: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            max_null_percentage: 5.0,
            max_duplicate_percentage: 1.0,
        }
    }
}

/// Validates staged batches against entity schemas.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    thresholds: QualityThresholds,
}

impl RecordValidator {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    /// Validates `records` for `schema`.
    ///
    /// `parents` holds the promoted batch of each parent entity. A parent
    /// with no entry is treated as an empty batch, so every present
    /// foreign-key value pointing at it is orphaned.
    pub fn validate(
        &self,
        schema: &EntitySchema,
        records: &[Record],
        parents: &ParentRecords,
    ) -> QualityReport {
        let mut report = QualityReport::new(&schema.name, records.len());
        let add = |report: &mut QualityReport, name: String, outcome: CheckOutcome| {
            let severity = schema.severity_of(&name);
            if !outcome.passed {
                debug!(
                    entity = %schema.name,
                    check = %name,
                    severity = %severity,
                    "check failed"
                );
            }
            report.add_check(name, severity, outcome);
        };

        add(
            &mut report,
            REQUIRED_FIELDS.to_string(),
            checks::required_fields(records, &schema.required_fields),
        );
        add(
            &mut report,
            NULL_PERCENTAGE.to_string(),
            checks::null_percentage(records, self.thresholds.max_null_percentage),
        );
        add(
            &mut report,
            DUPLICATES.to_string(),
            checks::duplicates(
                records,
                &schema.id_field,
                self.thresholds.max_duplicate_percentage,
            ),
        );

        for field in &schema.email_fields {
            add(&mut report, email_check(field), checks::email_format(records, field));
        }
        for constraint in &schema.enum_constraints {
            add(
                &mut report,
                enum_check(&constraint.field),
                checks::enum_membership(records, constraint),
            );
        }
        for constraint in &schema.range_constraints {
            add(
                &mut report,
                range_check(&constraint.field),
                checks::numeric_range(records, constraint),
            );
        }
        if schema.date_sequence_fields.len() >= 2 {
            add(
                &mut report,
                DATE_SEQUENCE.to_string(),
                checks::date_sequence(records, &schema.date_sequence_fields),
            );
        }
        for fk in &schema.foreign_keys {
            let parent_records = parents
                .get(&fk.parent_entity)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            add(
                &mut report,
                foreign_key_check(&fk.field),
                checks::foreign_key(records, fk, parent_records),
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use crate::schema::{CheckSeverity, SchemaRegistry};

    fn customer(id: &str) -> Record {
        let mut r = Record::new();
        r.insert("Customer_ID__c".into(), FieldValue::text(id));
        r.insert("First_Name__c".into(), "Ada".into());
        r.insert("Last_Name__c".into(), "Lovelace".into());
        r.insert("Email__c".into(), FieldValue::text(format!("{}@example.com", id.to_lowercase())));
        r
    }

    fn claim(id: &str, policy: &str, amount: f64) -> Record {
        let mut r = Record::new();
        r.insert("Claim_ID__c".into(), FieldValue::text(id));
        r.insert("Policy_ID__c".into(), FieldValue::text(policy));
        r.insert("Customer_ID__c".into(), "C-1".into());
        r.insert("Claim_Type__c".into(), "Death Benefit".into());
        r.insert("Claim_Amount__c".into(), FieldValue::float(amount));
        r
    }

    fn policy(id: &str) -> Record {
        let mut r = Record::new();
        r.insert("Policy_ID__c".into(), FieldValue::text(id));
        r
    }

    #[test]
    fn test_check_order_follows_schema() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.get("quotes").unwrap();
        let report = RecordValidator::default().validate(schema, &[], &ParentRecords::new());

        let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names[..3], ["required_fields", "null_percentage", "duplicates"]);
        assert_eq!(names[3], "enum:Product_Type__c");
        assert_eq!(names.last().copied(), Some("foreign_key:Agent_ID__c"));
        assert!(names.contains(&"date_sequence"));
    }

    #[test]
    fn test_empty_batch_passes() {
        let registry = SchemaRegistry::builtin().unwrap();
        for schema in registry.in_dependency_order() {
            let report = RecordValidator::default().validate(schema, &[], &ParentRecords::new());
            assert!(report.passed, "{} should pass when empty", schema.name);
            assert_eq!(report.record_count, 0);
        }
    }

    #[test]
    fn test_missing_id_fails_customers() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.get("customers").unwrap();
        let mut records: Vec<Record> = (0..10).map(|i| customer(&format!("C-{}", i))).collect();
        records[4].remove("Customer_ID__c");

        let report = RecordValidator::default().validate(schema, &records, &ParentRecords::new());
        assert!(!report.passed);
        assert_eq!(report.errors, vec!["Missing required fields in 1 records".to_string()]);
    }

    #[test]
    fn test_negative_claim_amount_is_warning_only() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.get("claims").unwrap();
        let records = vec![claim("CL-1", "P-1", 1000.0), claim("CL-2", "P-1", -50.0)];

        let mut parents = ParentRecords::new();
        parents.insert("policies".into(), vec![policy("P-1")]);
        parents.insert("customers".into(), vec![customer("C-1")]);

        let report = RecordValidator::default().validate(schema, &records, &parents);
        let range = report.check("numeric_range:Claim_Amount__c").unwrap();
        assert!(!range.passed);
        assert_eq!(range.severity, CheckSeverity::Warning);
        assert!(report.passed);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_missing_parent_batch_orphans_references() {
        let registry = SchemaRegistry::builtin().unwrap();
        let schema = registry.get("claims").unwrap();
        let records = vec![claim("CL-1", "P-1", 10.0)];

        let mut parents = ParentRecords::new();
        parents.insert("customers".into(), vec![customer("C-1")]);

        let report = RecordValidator::default().validate(schema, &records, &parents);
        let fk = report.check("foreign_key:Policy_ID__c").unwrap();
        assert_eq!(fk.details["orphaned_count"], 1);
        assert_eq!(fk.details["parent_record_count"], 0);
        assert!(!report.passed);
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let schema = EntitySchema::new("things", "id");
        let mut a = Record::new();
        a.insert("id".into(), "A".into());
        a.insert("note".into(), FieldValue::Null);

        let strict = RecordValidator::default().validate(&schema, &[a.clone()], &ParentRecords::new());
        assert_eq!(strict.warnings.len(), 1);

        let lax = RecordValidator::new(QualityThresholds {
            max_null_percentage: 50.0,
            ..QualityThresholds::default()
        })
        .validate(&schema, &[a], &ParentRecords::new());
        assert!(lax.warnings.is_empty());
    }
}
