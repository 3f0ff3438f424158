//! Snapshot store
//!
//! Two layers per entity:
//! - staged (QA): immutable timestamped batches; "latest" selects by write time
//! - promoted (PROD): a single current batch, replaced wholesale on success
//!
//! # Design Principles
//!
//! - Staged snapshots are read-only here
//! - Promoted replacement is atomic
//! - No promoted history

mod checksum;
mod document;
mod errors;
mod fs_store;
mod memory;
mod store;

pub use checksum::{compute_checksum, format_checksum, records_checksum};
pub use document::{
    Layer, PromotedDocument, PromotedMetadata, PromotedSnapshot, StagedDocument, StagedMetadata,
    StagedSnapshot, WriteReceipt,
};
pub use errors::{StoreError, StoreResult};
pub use fs_store::FsSnapshotStore;
pub use memory::MemorySnapshotStore;
pub use store::SnapshotStore;
