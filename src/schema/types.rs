//! Entity schema definitions
//!
//! An `EntitySchema` is pure configuration: which fields are required, which
//! field identifies a record, which value constraints apply, which foreign
//! keys point at parent entities, and which check failures are critical.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Check name: every required field present and non-null
pub const REQUIRED_FIELDS: &str = "required_fields";
/// Check name: ratio of blank slots across the batch
pub const NULL_PERCENTAGE: &str = "null_percentage";
/// Check name: ratio of duplicate id values
pub const DUPLICATES: &str = "duplicates";
/// Check name: ordering of the date sequence fields
pub const DATE_SEQUENCE: &str = "date_sequence";

/// Check name for the email format check on `field`.
pub fn email_check(field: &str) -> String {
    format!("email_format:{}", field)
}

/// Check name for the enum membership check on `field`.
pub fn enum_check(field: &str) -> String {
    format!("enum:{}", field)
}

/// Check name for the numeric range check on `field`.
pub fn range_check(field: &str) -> String {
    format!("numeric_range:{}", field)
}

/// Check name for the referential integrity check on `field`.
pub fn foreign_key_check(field: &str) -> String {
    format!("foreign_key:{}", field)
}

/// Severity of a check. Only critical failures fail a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSeverity {
    Critical,
    Warning,
}

impl CheckSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckSeverity::Critical => "critical",
            CheckSeverity::Warning => "warning",
        }
    }
}

impl fmt::Display for CheckSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A foreign key from a child field to a parent entity's id field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Field on the child record
    pub field: String,
    /// Parent entity name
    pub parent_entity: String,
    /// Field on the parent record the value must match
    pub parent_id_field: String,
}

/// Allowed values for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstraint {
    pub field: String,
    pub allowed: BTreeSet<String>,
}

/// Inclusive numeric bounds for a field. `None` is an open bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeConstraint {
    pub field: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Validation rules for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Entity name, also the snapshot directory name
    pub name: String,
    /// Field whose value identifies a record
    pub id_field: String,
    /// Fields that must be present and non-null
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub enum_constraints: Vec<EnumConstraint>,
    #[serde(default)]
    pub range_constraints: Vec<RangeConstraint>,
    /// Fields holding dates that must be non-decreasing in list order
    #[serde(default)]
    pub date_sequence_fields: Vec<String>,
    #[serde(default)]
    pub email_fields: Vec<String>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    /// Check names whose failure fails the report
    #[serde(default = "default_critical_checks")]
    pub critical_checks: BTreeSet<String>,
    /// Whether a failure of this entity aborts the rest of the run. Omitted
    /// from a catalog, roots abort and children do not.
    #[serde(default)]
    pub critical_path: Option<bool>,
}

impl EntitySchema {
    /// Create a schema with the id field required and the required-fields
    /// and duplicate checks marked critical.
    pub fn new(name: impl Into<String>, id_field: impl Into<String>) -> Self {
        let id_field = id_field.into();
        Self {
            name: name.into(),
            required_fields: vec![id_field.clone()],
            id_field,
            enum_constraints: Vec::new(),
            range_constraints: Vec::new(),
            date_sequence_fields: Vec::new(),
            email_fields: Vec::new(),
            foreign_keys: Vec::new(),
            critical_checks: default_critical_checks(),
            critical_path: Some(false),
        }
    }

    /// Add required fields. Duplicates are ignored.
    pub fn require<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.required_fields.contains(&field) {
                self.required_fields.push(field);
            }
        }
        self
    }

    pub fn one_of<I, S>(mut self, field: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_constraints.push(EnumConstraint {
            field: field.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn range(mut self, field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        self.range_constraints.push(RangeConstraint {
            field: field.into(),
            min,
            max,
        });
        self
    }

    /// Shorthand for a `[0, +inf)` range.
    pub fn non_negative(self, field: impl Into<String>) -> Self {
        self.range(field, Some(0.0), None)
    }

    pub fn email(mut self, field: impl Into<String>) -> Self {
        self.email_fields.push(field.into());
        self
    }

    pub fn date_sequence<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_sequence_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add a foreign key. Its integrity check is critical.
    pub fn references(
        mut self,
        field: impl Into<String>,
        parent_entity: impl Into<String>,
        parent_id_field: impl Into<String>,
    ) -> Self {
        let field = field.into();
        self.critical_checks.insert(foreign_key_check(&field));
        self.foreign_keys.push(ForeignKey {
            field,
            parent_entity: parent_entity.into(),
            parent_id_field: parent_id_field.into(),
        });
        self
    }

    pub fn critical_path(mut self) -> Self {
        self.critical_path = Some(true);
        self
    }

    /// Whether a failure of this entity aborts the rest of the run.
    pub fn is_critical_path(&self) -> bool {
        self.critical_path.unwrap_or_else(|| self.is_root())
    }

    /// Severity the named check runs with for this entity.
    pub fn severity_of(&self, check: &str) -> CheckSeverity {
        if self.critical_checks.contains(check) {
            CheckSeverity::Critical
        } else {
            CheckSeverity::Warning
        }
    }

    /// Distinct parent entities, in foreign-key declaration order.
    pub fn parent_entities(&self) -> Vec<&str> {
        let mut parents: Vec<&str> = Vec::new();
        for fk in &self.foreign_keys {
            if !parents.contains(&fk.parent_entity.as_str()) {
                parents.push(&fk.parent_entity);
            }
        }
        parents
    }

    /// An entity with no foreign keys is a root of the dependency graph.
    pub fn is_root(&self) -> bool {
        self.foreign_keys.is_empty()
    }

    /// Marks every foreign-key check critical and settles `critical_path`.
    /// Catalogs loaded from disk may omit both.
    pub(crate) fn normalize(&mut self) {
        for fk in &self.foreign_keys {
            self.critical_checks.insert(foreign_key_check(&fk.field));
        }
        self.critical_path = Some(self.is_critical_path());
    }

    /// Validates the schema on its own (not against other schemas).
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("entity name must not be empty".into());
        }
        if self.id_field.trim().is_empty() {
            return Err(format!("entity '{}': id field must not be empty", self.name));
        }
        for range in &self.range_constraints {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(format!(
                        "entity '{}': range on '{}' has min {} > max {}",
                        self.name, range.field, min, max
                    ));
                }
            }
        }
        Ok(())
    }
}

fn default_critical_checks() -> BTreeSet<String> {
    [REQUIRED_FIELDS, DUPLICATES]
        .iter()
        .map(|c| c.to_string())
        .collect()
}
