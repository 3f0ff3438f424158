//! Promotion subsystem
//!
//! Moves validated staged batches into the promoted layer, one entity at a
//! time in dependency order.
//!
//! # Stages
//!
//! Load, Validate, Clean, Write. Each is independently testable; the
//! orchestrator composes them and applies the abort policy.
//!
//! # Guarantees
//!
//! - The promoted layer holds either the prior valid snapshot or the new one
//! - Per-entity promotion is idempotent apart from the promotion timestamp
//! - No multi-entity atomicity: each entity is its own unit

mod clean;
mod errors;
mod orchestrator;
mod result;
mod state;

pub use clean::{clean_record, clean_records, DEFAULT_TRANSIENT_FIELDS};
pub use errors::{ErrorKind, PromotionError};
pub use orchestrator::{PromotionOrchestrator, RunOptions, RunSelection};
pub use result::{AbortInfo, PromotionResult, RunReport, SkippedEntity};
pub use state::EntityPhase;
