//! Entity schema registry
//!
//! Static, immutable per-entity rules: required fields, id field,
//! enum/range/foreign-key constraints, severity tags, and the global
//! dependency order. Built once and passed by reference; nothing mutates it
//! during a run.

pub mod catalog;
mod errors;
mod loader;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::SchemaLoader;
pub use registry::SchemaRegistry;
pub use types::{
    email_check, enum_check, foreign_key_check, range_check, CheckSeverity, EntitySchema,
    EnumConstraint, ForeignKey, RangeConstraint, DATE_SEQUENCE, DUPLICATES, NULL_PERCENTAGE,
    REQUIRED_FIELDS,
};
