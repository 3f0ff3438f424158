//! Record model
//!
//! Records are duck-typed field maps whose shape varies per entity. Unknown
//! fields are preserved end to end.

mod value;

pub use value::{present, FieldValue, IdKey, Record};
