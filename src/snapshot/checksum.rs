//! CRC32 checksums over cleaned record arrays
//!
//! Uses CRC32 (IEEE polynomial) via crc32fast. The checksum is taken over the
//! compact JSON serialization of the records, which is deterministic because
//! records are sorted maps.

use crc32fast::Hasher;

use super::errors::{StoreError, StoreResult};
use crate::record::Record;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Checksum of a record array, formatted as `crc32:xxxxxxxx`.
///
/// # Errors
///
/// Returns `StoreError::Serialize` if the records cannot be encoded as JSON.
pub fn records_checksum(entity: &str, records: &[Record]) -> StoreResult<String> {
    let bytes = serde_json::to_vec(records).map_err(|source| StoreError::Serialize {
        entity: entity.to_string(),
        source,
    })?;
    Ok(format_checksum(compute_checksum(&bytes)))
}

/// Format: `crc32:XXXXXXXX` (lowercase hex, 8 characters, zero-padded)
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn record(id: &str) -> Record {
        let mut r = Record::new();
        r.insert("id".into(), FieldValue::text(id));
        r.insert("amount".into(), FieldValue::int(10));
        r
    }

    #[test]
    fn test_records_checksum_is_deterministic() {
        let a = records_checksum("t", &[record("1"), record("2")]).unwrap();
        let b = records_checksum("t", &[record("1"), record("2")]).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("crc32:"));
        assert_eq!(a.len(), "crc32:".len() + 8);
    }

    #[test]
    fn test_records_checksum_depends_on_order() {
        let a = records_checksum("t", &[record("1"), record("2")]).unwrap();
        let b = records_checksum("t", &[record("2"), record("1")]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_format_checksum() {
        assert_eq!(format_checksum(0xDEADBEEF), "crc32:deadbeef");
        assert_eq!(format_checksum(0x00000001), "crc32:00000001");
    }
}
