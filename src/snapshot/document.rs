//! Staged and promoted snapshot documents
//!
//! Staged: `{metadata: {source, extracted_at, record_count, layer: "QA"}, data: [...]}`
//! Promoted: `{metadata: {source, qa_extracted_at, promoted_at, record_count, layer: "PROD"}, data: [...]}`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::record::Record;

/// Pipeline layer a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    #[serde(rename = "QA")]
    Staged,
    #[serde(rename = "PROD")]
    Promoted,
}

fn staged_layer() -> Layer {
    Layer::Staged
}

fn promoted_layer() -> Layer {
    Layer::Promoted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedMetadata {
    pub source: String,
    pub extracted_at: String,
    #[serde(default)]
    pub record_count: usize,
    #[serde(default = "staged_layer")]
    pub layer: Layer,
    /// Generator-specific metadata, carried but never interpreted
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A staged batch as written by a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedDocument {
    pub metadata: StagedMetadata,
    #[serde(default)]
    pub data: Vec<Record>,
}

impl StagedDocument {
    pub fn new(source: impl Into<String>, extracted_at: impl Into<String>, data: Vec<Record>) -> Self {
        Self {
            metadata: StagedMetadata {
                source: source.into(),
                extracted_at: extracted_at.into(),
                record_count: data.len(),
                layer: Layer::Staged,
                extra: BTreeMap::new(),
            },
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotedMetadata {
    pub source: String,
    pub qa_extracted_at: String,
    pub promoted_at: DateTime<Utc>,
    pub record_count: usize,
    #[serde(default = "promoted_layer")]
    pub layer: Layer,
}

/// The single current promoted batch of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotedDocument {
    pub metadata: PromotedMetadata,
    pub data: Vec<Record>,
}

impl PromotedDocument {
    /// Builds the promoted document for cleaned `data`, keeping the staged
    /// batch's lineage.
    pub fn from_staged(staged: &StagedMetadata, data: Vec<Record>, promoted_at: DateTime<Utc>) -> Self {
        Self {
            metadata: PromotedMetadata {
                source: staged.source.clone(),
                qa_extracted_at: staged.extracted_at.clone(),
                promoted_at,
                record_count: data.len(),
                layer: Layer::Promoted,
            },
            data,
        }
    }
}

/// A staged document plus where and when it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedSnapshot {
    pub entity: String,
    pub location: String,
    pub written_at: DateTime<Utc>,
    pub document: StagedDocument,
}

impl StagedSnapshot {
    pub fn records(&self) -> &[Record] {
        &self.document.data
    }
}

/// The current promoted document plus where it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotedSnapshot {
    pub entity: String,
    pub location: String,
    pub document: PromotedDocument,
}

impl PromotedSnapshot {
    pub fn records(&self) -> &[Record] {
        &self.document.data
    }
}

/// Outcome of a promoted write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub location: String,
    /// `crc32:xxxxxxxx` over the written record array
    pub checksum: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_staged_document_parses_generator_output() {
        let raw = json!({
            "metadata": {
                "source": "Life Insurance Generator",
                "extracted_at": "2024-06-01T12:00:00.000001",
                "record_count": 1,
                "layer": "QA",
                "seed": 42
            },
            "data": [{"Customer_ID__c": "CUST-00001", "Age__c": 40}]
        });
        let doc: StagedDocument = serde_json::from_value(raw).unwrap();
        assert_eq!(doc.metadata.layer, Layer::Staged);
        assert_eq!(doc.metadata.extra["seed"], 42);
        assert_eq!(doc.data.len(), 1);
    }

    #[test]
    fn test_staged_document_requires_lineage() {
        let raw = json!({"metadata": {"record_count": 0}, "data": []});
        assert!(serde_json::from_value::<StagedDocument>(raw).is_err());
    }

    #[test]
    fn test_promoted_document_carries_lineage() {
        let staged = StagedDocument::new("generator", "2024-06-01T12:00:00", vec![]);
        let promoted = PromotedDocument::from_staged(&staged.metadata, vec![Record::new()], Utc::now());
        assert_eq!(promoted.metadata.qa_extracted_at, "2024-06-01T12:00:00");
        assert_eq!(promoted.metadata.record_count, 1);

        let value = serde_json::to_value(&promoted).unwrap();
        assert_eq!(value["metadata"]["layer"], "PROD");
        assert_eq!(value["metadata"]["source"], "generator");
    }
}
