use super::document::{PromotedDocument, PromotedSnapshot, StagedSnapshot, WriteReceipt};
use super::errors::StoreResult;

/// Read/replace access to the two pipeline layers.
///
/// Staged snapshots are read-only through this trait. The promoted snapshot
/// of an entity is single-instance and replaced wholesale; implementations
/// must never expose a partially written promoted snapshot.
pub trait SnapshotStore {
    /// Most recently written staged snapshot of `entity`, if any.
    fn latest_staged(&self, entity: &str) -> StoreResult<Option<StagedSnapshot>>;

    /// Current promoted snapshot of `entity`, if any.
    fn latest_promoted(&self, entity: &str) -> StoreResult<Option<PromotedSnapshot>>;

    /// Atomically replaces the promoted snapshot of `entity`.
    fn write_promoted(&mut self, entity: &str, document: &PromotedDocument) -> StoreResult<WriteReceipt>;
}
