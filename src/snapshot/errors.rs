//! Snapshot store errors
//!
//! Every store failure surfaces to the orchestrator as an I/O failure for the
//! entity being processed; the variants keep enough context for operators.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unparsable snapshot document {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize snapshot for {entity}: {source}")]
    Serialize {
        entity: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(location: impl Into<String>, source: serde_json::Error) -> Self {
        StoreError::Parse {
            location: location.into(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = StoreError::io(
            "/data/prod/customers/customers_latest.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let text = err.to_string();
        assert!(text.contains("customers_latest.json"));
        assert!(text.contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_parse_error_names_location() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::parse("qa/quotes/quotes_1.json", source);
        assert!(err.to_string().starts_with("unparsable snapshot document qa/quotes/quotes_1.json"));
    }
}
