//! Per-entity promotion phases
//!
//! `Pending -> Validating -> Cleaning -> Writing -> Succeeded`
//!
//! - `Failed` is reachable from every non-terminal phase
//! - `Aborted` is reachable only from `Pending`: an entity that never started
//!   because an earlier critical-path entity failed or the run was cancelled
//!
//! Transitions consume the phase and return the next one. Anything else is a
//! forbidden transition.

use serde::Serialize;

use super::errors::PromotionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityPhase {
    Pending,
    Validating,
    Cleaning,
    Writing,
    Succeeded,
    Failed,
    Aborted,
}

impl Default for EntityPhase {
    fn default() -> Self {
        EntityPhase::Pending
    }
}

impl EntityPhase {
    pub fn name(&self) -> &'static str {
        match self {
            EntityPhase::Pending => "Pending",
            EntityPhase::Validating => "Validating",
            EntityPhase::Cleaning => "Cleaning",
            EntityPhase::Writing => "Writing",
            EntityPhase::Succeeded => "Succeeded",
            EntityPhase::Failed => "Failed",
            EntityPhase::Aborted => "Aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EntityPhase::Succeeded | EntityPhase::Failed | EntityPhase::Aborted
        )
    }

    /// Pending -> Validating
    pub fn begin_validation(self) -> Result<Self, PromotionError> {
        match self {
            EntityPhase::Pending => Ok(EntityPhase::Validating),
            _ => Err(PromotionError::forbidden_transition(self.name(), "Validating")),
        }
    }

    /// Validating -> Cleaning
    pub fn begin_cleaning(self) -> Result<Self, PromotionError> {
        match self {
            EntityPhase::Validating => Ok(EntityPhase::Cleaning),
            _ => Err(PromotionError::forbidden_transition(self.name(), "Cleaning")),
        }
    }

    /// Cleaning -> Writing
    pub fn begin_writing(self) -> Result<Self, PromotionError> {
        match self {
            EntityPhase::Cleaning => Ok(EntityPhase::Writing),
            _ => Err(PromotionError::forbidden_transition(self.name(), "Writing")),
        }
    }

    /// Writing -> Succeeded
    pub fn succeed(self) -> Result<Self, PromotionError> {
        match self {
            EntityPhase::Writing => Ok(EntityPhase::Succeeded),
            _ => Err(PromotionError::forbidden_transition(self.name(), "Succeeded")),
        }
    }

    /// Any non-terminal phase -> Failed
    pub fn fail(self) -> Result<Self, PromotionError> {
        if self.is_terminal() {
            return Err(PromotionError::forbidden_transition(self.name(), "Failed"));
        }
        Ok(EntityPhase::Failed)
    }

    /// Pending -> Aborted
    pub fn abort(self) -> Result<Self, PromotionError> {
        match self {
            EntityPhase::Pending => Ok(EntityPhase::Aborted),
            _ => Err(PromotionError::forbidden_transition(self.name(), "Aborted")),
        }
    }
}
