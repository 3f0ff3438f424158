//! In-memory snapshot store
//!
//! Same contract as the filesystem store without touching disk. Staged
//! snapshots are appended with an explicit write time; promoted snapshots are
//! replaced wholesale.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::checksum::records_checksum;
use super::document::{
    PromotedDocument, PromotedSnapshot, StagedDocument, StagedSnapshot, WriteReceipt,
};
use super::errors::StoreResult;
use super::store::SnapshotStore;

#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    staged: HashMap<String, Vec<StagedSnapshot>>,
    promoted: HashMap<String, PromotedDocument>,
    writes: usize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a staged snapshot written at `written_at`.
    pub fn stage(&mut self, entity: &str, document: StagedDocument, written_at: DateTime<Utc>) {
        let batches = self.staged.entry(entity.to_string()).or_default();
        let location = format!("memory://qa/{}/{}", entity, batches.len());
        batches.push(StagedSnapshot {
            entity: entity.to_string(),
            location,
            written_at,
            document,
        });
    }

    /// Seeds the promoted layer directly, bypassing the write counter.
    pub fn seed_promoted(&mut self, entity: &str, document: PromotedDocument) {
        self.promoted.insert(entity.to_string(), document);
    }

    /// Number of promoted writes performed through the store trait.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn promoted_location(entity: &str) -> String {
        format!("memory://prod/{}/{}_latest.json", entity, entity)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn latest_staged(&self, entity: &str) -> StoreResult<Option<StagedSnapshot>> {
        // Later insertions win ties, matching the name tie-break on disk.
        Ok(self
            .staged
            .get(entity)
            .and_then(|batches| {
                batches
                    .iter()
                    .enumerate()
                    .max_by_key(|(i, s)| (s.written_at, *i))
                    .map(|(_, s)| s.clone())
            }))
    }

    fn latest_promoted(&self, entity: &str) -> StoreResult<Option<PromotedSnapshot>> {
        Ok(self.promoted.get(entity).map(|document| PromotedSnapshot {
            entity: entity.to_string(),
            location: Self::promoted_location(entity),
            document: document.clone(),
        }))
    }

    fn write_promoted(&mut self, entity: &str, document: &PromotedDocument) -> StoreResult<WriteReceipt> {
        let checksum = records_checksum(entity, &document.data)?;
        self.promoted.insert(entity.to_string(), document.clone());
        self.writes += 1;
        Ok(WriteReceipt {
            location: Self::promoted_location(entity),
            checksum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_latest_staged_by_write_time() {
        let mut store = MemorySnapshotStore::new();
        let now = Utc::now();
        store.stage("quotes", StagedDocument::new("a", "t1", vec![]), now);
        store.stage("quotes", StagedDocument::new("b", "t0", vec![]), now - Duration::hours(1));

        let latest = store.latest_staged("quotes").unwrap().unwrap();
        assert_eq!(latest.document.metadata.source, "a");
        assert!(store.latest_staged("claims").unwrap().is_none());
    }

    #[test]
    fn test_write_replaces_promoted() {
        let mut store = MemorySnapshotStore::new();
        let staged = StagedDocument::new("gen", "t", vec![]);
        let doc = PromotedDocument::from_staged(&staged.metadata, vec![], Utc::now());

        store.write_promoted("agents", &doc).unwrap();
        store.write_promoted("agents", &doc).unwrap();

        assert_eq!(store.write_count(), 2);
        let current = store.latest_promoted("agents").unwrap().unwrap();
        assert_eq!(current.document, doc);
    }
}
