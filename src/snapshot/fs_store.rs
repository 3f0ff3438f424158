//! Filesystem snapshot store
//!
//! Layout under the data directory:
//! - `qa/<entity>/*.json`: staged snapshots, any number, never modified
//! - `prod/<entity>/<entity>_latest.json`: the promoted snapshot
//!
//! Promoted writes are atomic:
//! 1. Write `<file>.tmp`
//! 2. fsync the temp file
//! 3. Rename over the target (atomic on POSIX)
//! 4. fsync the directory so the rename is durable
//!
//! A leftover `.tmp` never has a `.json` extension and is never read.

use chrono::{DateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::checksum::records_checksum;
use super::document::{
    PromotedDocument, PromotedSnapshot, StagedDocument, StagedSnapshot, WriteReceipt,
};
use super::errors::{StoreError, StoreResult};
use super::store::SnapshotStore;

const STAGED_DIR: &str = "qa";
const PROMOTED_DIR: &str = "prod";

#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    data_dir: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn staged_dir(&self, entity: &str) -> PathBuf {
        self.data_dir.join(STAGED_DIR).join(entity)
    }

    pub fn promoted_path(&self, entity: &str) -> PathBuf {
        self.data_dir
            .join(PROMOTED_DIR)
            .join(entity)
            .join(format!("{}_latest.json", entity))
    }

    /// Newest `*.json` in the staged directory by modification time, ties
    /// broken by file name.
    fn latest_staged_file(&self, entity: &str) -> StoreResult<Option<(PathBuf, SystemTime)>> {
        let dir = self.staged_dir(entity);
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut latest: Option<(PathBuf, SystemTime)> = None;
        for entry in fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))? {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .map_err(|e| StoreError::io(&path, e))?;

            let newer = match &latest {
                None => true,
                Some((best_path, best_time)) => (modified, &path) > (*best_time, best_path),
            };
            if newer {
                latest = Some((path, modified));
            }
        }
        Ok(latest)
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn latest_staged(&self, entity: &str) -> StoreResult<Option<StagedSnapshot>> {
        let (path, modified) = match self.latest_staged_file(entity)? {
            Some(found) => found,
            None => return Ok(None),
        };

        let content = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let location = path.display().to_string();
        let document: StagedDocument =
            serde_json::from_str(&content).map_err(|e| StoreError::parse(&location, e))?;

        Ok(Some(StagedSnapshot {
            entity: entity.to_string(),
            location,
            written_at: DateTime::<Utc>::from(modified),
            document,
        }))
    }

    fn latest_promoted(&self, entity: &str) -> StoreResult<Option<PromotedSnapshot>> {
        let path = self.promoted_path(entity);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let location = path.display().to_string();
        let document: PromotedDocument =
            serde_json::from_str(&content).map_err(|e| StoreError::parse(&location, e))?;

        Ok(Some(PromotedSnapshot {
            entity: entity.to_string(),
            location,
            document,
        }))
    }

    fn write_promoted(&mut self, entity: &str, document: &PromotedDocument) -> StoreResult<WriteReceipt> {
        let path = self.promoted_path(entity);
        let checksum = records_checksum(entity, &document.data)?;
        let content = serde_json::to_string_pretty(document).map_err(|source| {
            StoreError::Serialize {
                entity: entity.to_string(),
                source,
            }
        })?;

        write_atomic(&path, content.as_bytes())?;

        Ok(WriteReceipt {
            location: path.display().to_string(),
            checksum,
        })
    }
}

/// Replaces `path` with `content` so readers see either the old file or the
/// new one, never a partial write.
///
/// # Arguments
///
/// * `path` - Final location; its directory is created if missing
/// * `content` - Bytes written to `<path>.tmp`, synced, then renamed over `path`
///
/// # Errors
///
/// Returns `StoreError::Io` naming the file that failed. A failure before the
/// rename leaves the previous file at `path` untouched.
fn write_atomic(path: &Path, content: &[u8]) -> StoreResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| StoreError::io(path, std::io::Error::from(std::io::ErrorKind::NotFound)))?;
    fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| StoreError::io(&temp_path, e))?;
    file.write_all(content)
        .map_err(|e| StoreError::io(&temp_path, e))?;
    file.sync_all().map_err(|e| StoreError::io(&temp_path, e))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| StoreError::io(path, e))?;

    // Directory fsync is best effort; not every platform supports it.
    if let Ok(dir) = File::open(parent) {
        let _ = dir.sync_all();
    }

    Ok(())
}
