//! Document domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::timestamp;

/// Fields extracted from a document by the service
///
/// The key set depends on the document type, so it is kept as a free-form
/// JSON object.
pub type ExtractedFields = serde_json::Map<String, serde_json::Value>;

/// One uploaded file within a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub id: String,
    pub filename: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default, alias = "confidence")]
    pub doc_type_confidence: Option<f64>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl DocumentDetail {
    /// Classified type, or `"unclassified"` while the service has not decided
    pub fn doc_type_label(&self) -> &str {
        self.doc_type.as_deref().unwrap_or("unclassified")
    }
}

/// Per-document processing status
///
/// Mirrors the service's pipeline sub-stages. Values this client does not
/// know are kept in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    Queued,
    Extracting,
    Classifying,
    Parsing,
    BuildingFhir,
    Validating,
    Completed,
    Failed,
    Other(String),
}

impl DocumentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DocumentStatus::Queued => "queued",
            DocumentStatus::Extracting => "extracting",
            DocumentStatus::Classifying => "classifying",
            DocumentStatus::Parsing => "parsing",
            DocumentStatus::BuildingFhir => "building_fhir",
            DocumentStatus::Validating => "validating",
            DocumentStatus::Completed => "completed",
            DocumentStatus::Failed => "failed",
            DocumentStatus::Other(raw) => raw,
        }
    }

    /// Whether the document has left the pipeline
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Failed)
    }
}

impl From<&str> for DocumentStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "queued" => DocumentStatus::Queued,
            "extracting" => DocumentStatus::Extracting,
            "classifying" => DocumentStatus::Classifying,
            "parsing" => DocumentStatus::Parsing,
            "building_fhir" => DocumentStatus::BuildingFhir,
            "validating" => DocumentStatus::Validating,
            "completed" => DocumentStatus::Completed,
            "failed" => DocumentStatus::Failed,
            other => DocumentStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for DocumentStatus {
    fn from(raw: String) -> Self {
        DocumentStatus::from(raw.as_str())
    }
}

impl From<DocumentStatus> for String {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
