//! Schema error types
//!
//! Error codes:
//! - LAKE_SCHEMA_UNKNOWN_ENTITY
//! - LAKE_SCHEMA_DUPLICATE_ENTITY
//! - LAKE_SCHEMA_ID_NOT_REQUIRED
//! - LAKE_SCHEMA_UNKNOWN_PARENT
//! - LAKE_SCHEMA_CYCLE
//! - LAKE_SCHEMA_MALFORMED

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Requested entity is not registered
    UnknownEntity,
    /// Two schemas share a name
    DuplicateEntity,
    /// The id field is not listed among the required fields
    IdNotRequired,
    /// A foreign key points at an entity that is not registered
    UnknownParent,
    /// Foreign keys form a cycle; no dependency order exists
    Cycle,
    /// Schema catalog file could not be read or parsed
    Malformed,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownEntity => "LAKE_SCHEMA_UNKNOWN_ENTITY",
            SchemaErrorCode::DuplicateEntity => "LAKE_SCHEMA_DUPLICATE_ENTITY",
            SchemaErrorCode::IdNotRequired => "LAKE_SCHEMA_ID_NOT_REQUIRED",
            SchemaErrorCode::UnknownParent => "LAKE_SCHEMA_UNKNOWN_PARENT",
            SchemaErrorCode::Cycle => "LAKE_SCHEMA_CYCLE",
            SchemaErrorCode::Malformed => "LAKE_SCHEMA_MALFORMED",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with the entity it concerns, if any.
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    entity: Option<String>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String, entity: Option<String>) -> Self {
        Self {
            code,
            message,
            entity,
        }
    }

    /// Requested entity name is absent from the registry
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::UnknownEntity,
            format!("Entity '{}' is not registered", entity),
            Some(entity),
        )
    }

    pub fn duplicate_entity(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::DuplicateEntity,
            format!("Entity '{}' is declared more than once", entity),
            Some(entity),
        )
    }

    pub fn id_not_required(entity: impl Into<String>, id_field: &str) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::IdNotRequired,
            format!(
                "Entity '{}': id field '{}' must be a required field",
                entity, id_field
            ),
            Some(entity),
        )
    }

    pub fn unknown_parent(entity: impl Into<String>, field: &str, parent: &str) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::UnknownParent,
            format!(
                "Entity '{}': foreign key '{}' references unregistered entity '{}'",
                entity, field, parent
            ),
            Some(entity),
        )
    }

    /// `remaining` lists the entities that could not be ordered.
    pub fn cycle(remaining: &[String]) -> Self {
        Self::new(
            SchemaErrorCode::Cycle,
            format!(
                "Foreign keys form a dependency cycle among: {}",
                remaining.join(", ")
            ),
            None,
        )
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::Malformed,
            format!("Malformed schema catalog '{}': {}", path.into(), reason.into()),
            None,
        )
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the entity name if the error concerns one
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
