//! Pipeline events
//!
//! Every milestone the pipeline logs is named by one of these variants so log
//! consumers can match on a stable `event` field.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Setup
    /// Pipeline configuration loaded
    ConfigLoaded,
    /// Schema registry built
    SchemasLoaded,

    // Run lifecycle
    RunBegin,
    RunComplete,
    /// Critical-path failure stopped the run
    RunAborted,
    /// Cancellation observed between entities
    RunCancelled,

    // Entity lifecycle
    EntityBegin,
    EntityComplete,
    EntityFailed,
    /// Entity not attempted because the run stopped
    EntitySkipped,

    // Stages
    NoStagedData,
    /// Parent entity has no promoted snapshot yet
    ParentMissing,
    ValidationPassed,
    ValidationFailed,
    /// Validation skipped by request
    ValidationBypassed,
    PromotedWrite,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",

            Event::RunBegin => "RUN_BEGIN",
            Event::RunComplete => "RUN_COMPLETE",
            Event::RunAborted => "RUN_ABORTED",
            Event::RunCancelled => "RUN_CANCELLED",

            Event::EntityBegin => "ENTITY_BEGIN",
            Event::EntityComplete => "ENTITY_COMPLETE",
            Event::EntityFailed => "ENTITY_FAILED",
            Event::EntitySkipped => "ENTITY_SKIPPED",

            Event::NoStagedData => "NO_STAGED_DATA",
            Event::ParentMissing => "PARENT_MISSING",
            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::ValidationBypassed => "VALIDATION_BYPASSED",
            Event::PromotedWrite => "PROMOTED_WRITE",
        }
    }

    /// Whether the event reports a failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::RunAborted | Event::EntityFailed | Event::NoStagedData | Event::ValidationFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
