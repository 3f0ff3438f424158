//! Date parsing for sequence checks
//!
//! Staged records carry dates as text in a handful of shapes. Parsing is an
//! explicit result: a present value either parses or is `Malformed`, and the
//! sequence check decides what to do with malformed values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::record::FieldValue;

/// Naive datetime layouts accepted besides RFC 3339 and bare dates.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Outcome of parsing one present date value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    Parsed(NaiveDateTime),
    Malformed,
}

impl ParsedDate {
    pub fn parse(value: &FieldValue) -> Self {
        match value.as_str() {
            Some(text) => parse_text(text.trim()),
            None => ParsedDate::Malformed,
        }
    }

    pub fn value(&self) -> Option<NaiveDateTime> {
        match self {
            ParsedDate::Parsed(dt) => Some(*dt),
            ParsedDate::Malformed => None,
        }
    }
}

fn parse_text(text: &str) -> ParsedDate {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return ParsedDate::Parsed(dt.naive_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return ParsedDate::Parsed(dt);
        }
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(ParsedDate::Parsed)
        .unwrap_or(ParsedDate::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ParsedDate {
        ParsedDate::parse(&FieldValue::text(s))
    }

    #[test]
    fn test_accepted_shapes() {
        assert!(parse("2024-03-01").value().is_some());
        assert!(parse("2024-03-01T10:15:00").value().is_some());
        assert!(parse("2024-03-01T10:15:00.123456").value().is_some());
        assert!(parse("2024-03-01 10:15:00").value().is_some());
        assert!(parse("2024-03-01T10:15:00Z").value().is_some());
        assert!(parse("2024-03-01T10:15:00+02:00").value().is_some());
    }

    #[test]
    fn test_malformed_values() {
        assert_eq!(parse("next tuesday"), ParsedDate::Malformed);
        assert_eq!(parse("2024-13-01"), ParsedDate::Malformed);
        assert_eq!(ParsedDate::parse(&FieldValue::int(20240301)), ParsedDate::Malformed);
    }

    #[test]
    fn test_offsets_normalize_to_utc() {
        let a = parse("2024-03-01T10:00:00+02:00").value().unwrap();
        let b = parse("2024-03-01T08:00:00Z").value().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bare_date_is_midnight() {
        let date = parse("2024-03-01").value().unwrap();
        let datetime = parse("2024-03-01T00:00:00").value().unwrap();
        assert_eq!(date, datetime);
    }
}
