//! Promotion error types
//!
//! Every per-entity failure is captured in that entity's result; only
//! `UnknownEntity` escapes a run, and only before any I/O happens.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::snapshot::StoreError;

/// Stable classification carried on failed promotion results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Requested entity is not in the schema registry
    UnknownEntity,
    /// No staged snapshot exists
    NoStagedData,
    /// At least one critical check failed
    ValidationFailed,
    /// Snapshot store read or write failed
    IoFailure,
    /// Phase machine misuse
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownEntity => "unknown_entity",
            ErrorKind::NoStagedData => "no_staged_data",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::IoFailure => "io_failure",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PromotionError {
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("no staged data found for {0}")]
    NoStagedData(String),

    #[error("validation failed for {entity}: {summary}")]
    ValidationFailed { entity: String, summary: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("forbidden transition: {from} -> {to}")]
    ForbiddenTransition { from: &'static str, to: &'static str },
}

impl PromotionError {
    pub fn forbidden_transition(from: &'static str, to: &'static str) -> Self {
        PromotionError::ForbiddenTransition { from, to }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PromotionError::UnknownEntity(_) => ErrorKind::UnknownEntity,
            PromotionError::NoStagedData(_) => ErrorKind::NoStagedData,
            PromotionError::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            PromotionError::Store(_) => ErrorKind::IoFailure,
            PromotionError::ForbiddenTransition { .. } => ErrorKind::Internal,
        }
    }
}
