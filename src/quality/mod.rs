//! Record validation
//!
//! A library of independent batch checks plus the per-entity validator
//! that runs the schema-configured subset and produces a quality report.

pub mod checks;
mod dates;
mod report;
mod validator;

pub use checks::CheckOutcome;
pub use dates::ParsedDate;
pub use report::{CheckResult, QualityReport};
pub use validator::{ParentRecords, QualityThresholds, RecordValidator};
