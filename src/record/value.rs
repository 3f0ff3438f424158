//! Tagged field values
//!
//! Staged records are loosely shaped: each entity carries its own set of
//! fields and generators may add fields the schema never mentions. A record
//! is therefore a map from field name to a tagged value rather than a fixed
//! struct. Nested values (`List`, `Map`) are carried through untouched; no
//! check looks inside them.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

/// A single record: field name to value, sorted by field name.
pub type Record = BTreeMap<String, FieldValue>;

/// Value of one record field.
///
/// Variant order matters for untagged deserialization: `null` must match
/// `Null` before anything else is attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON null
    Null,
    /// Boolean
    Bool(bool),
    /// Number, kept in its JSON form so integers stay integers
    Number(Number),
    /// UTF-8 text
    Text(String),
    /// Nested array (opaque to checks)
    List(Vec<FieldValue>),
    /// Nested object (opaque to checks)
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Build a text value.
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Build an integer value.
    pub fn int(n: i64) -> Self {
        FieldValue::Number(Number::from(n))
    }

    /// Build a float value. Non-finite floats have no JSON form and become null.
    pub fn float(n: f64) -> Self {
        Number::from_f64(n)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Null, empty text, or an empty collection.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Map(fields) => fields.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Raw text form used for ordering records by id.
    ///
    /// Text is returned as-is, numbers and booleans in their JSON spelling.
    /// Null and nested values sort as the empty string.
    pub fn raw_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Null | FieldValue::List(_) | FieldValue::Map(_) => String::new(),
        }
    }

    /// Typed identity key, or `None` for values that cannot identify a record
    /// (null, blank text, nested values).
    ///
    /// Text is trimmed first: promotion trims text values, so `"A"` and
    /// `"A "` are the same id once promoted.
    pub fn id_key(&self) -> Option<IdKey> {
        match self {
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| IdKey::Text(trimmed.to_string()))
            }
            FieldValue::Number(n) => Some(IdKey::Number(n.to_string())),
            FieldValue::Bool(b) => Some(IdKey::Bool(*b)),
            _ => None,
        }
    }

    /// Converts to a plain JSON value for report details.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::int(n)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::float(n)
    }
}

/// Exact, typed identity of a record id or foreign-key value.
///
/// Text `"5"` and number `5` are different keys; no coercion happens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdKey {
    Text(String),
    Number(String),
    Bool(bool),
}

/// Returns the field value if the field exists and is not null.
pub fn present<'r>(record: &'r Record, field: &str) -> Option<&'r FieldValue> {
    record.get(field).filter(|v| !v.is_null())
}
