//! Cleaning stage
//!
//! Turns a validated staged batch into the promoted record array:
//! 1. Drop fields whose value is null or empty text
//! 2. Drop transient extraction metadata
//! 3. Trim top-level text values
//! 4. Stable-sort by the raw text of the id field
//!
//! Cleaning is pure: the same input always yields the same output.

use crate::record::{FieldValue, Record};

/// Field generators stamp on every record at extraction time.
pub const DEFAULT_TRANSIENT_FIELDS: [&str; 1] = ["extracted_at"];

pub fn clean_record(record: &Record, transient_fields: &[String]) -> Record {
    record
        .iter()
        .filter(|(_, value)| !matches!(value, FieldValue::Null) && value.as_str() != Some(""))
        .filter(|(field, _)| !transient_fields.iter().any(|t| t == *field))
        .map(|(field, value)| {
            let value = match value {
                FieldValue::Text(s) => FieldValue::Text(s.trim().to_string()),
                other => other.clone(),
            };
            (field.clone(), value)
        })
        .collect()
}

pub fn clean_records(records: &[Record], id_field: &str, transient_fields: &[String]) -> Vec<Record> {
    let mut cleaned: Vec<Record> = records
        .iter()
        .map(|r| clean_record(r, transient_fields))
        .collect();
    cleaned.sort_by_cached_key(|r| r.get(id_field).map(FieldValue::raw_text).unwrap_or_default());
    cleaned
}
