//! ObservationScope for paired begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` or `{name}_FAILED` when closed
//! - Logs `{name}_INCOMPLETE` on drop if never closed

use std::cell::Cell;
use std::time::Instant;
use tracing::{info, warn};

/// A scope that logs its own start and outcome.
///
/// ```ignore
/// let scope = ObservationScope::new("PROMOTE", "customers");
/// // ... do work ...
/// scope.complete(); // logs PROMOTE_COMPLETE with elapsed_ms
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    entity: &'a str,
    started: Instant,
    completed: Cell<bool>,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str, entity: &'a str) -> Self {
        info!(event = %format!("{}_BEGIN", name), entity, "scope started");
        Self {
            name,
            entity,
            started: Instant::now(),
            completed: Cell::new(false),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    pub fn complete(self) {
        self.completed.set(true);
        info!(
            event = %format!("{}_COMPLETE", self.name),
            entity = self.entity,
            elapsed_ms = self.elapsed_ms() as u64,
            "scope completed"
        );
    }

    pub fn fail(self, reason: &str) {
        self.completed.set(true);
        warn!(
            event = %format!("{}_FAILED", self.name),
            entity = self.entity,
            elapsed_ms = self.elapsed_ms() as u64,
            reason,
            "scope failed"
        );
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            warn!(
                event = %format!("{}_INCOMPLETE", self.name),
                entity = self.entity,
                "scope dropped without completion"
            );
        }
    }
}
