//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::document::{DocumentDetail, DocumentStatus};
use super::timestamp;

/// Full job record with its documents, as returned by `GET /api/jobs/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub use_case: UseCase,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub documents: Vec<DocumentDetail>,
}

impl JobDetail {
    /// Whether no further status transitions are expected
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Best-effort guess of where the job is in the conversion pipeline
    ///
    /// The earliest stage any document is still in wins. Returns `None` while
    /// the job is queued or reports statuses this client does not recognise.
    pub fn pipeline_stage(&self) -> Option<PipelineStage> {
        let any = |wanted: DocumentStatus| self.documents.iter().any(|d| d.status == wanted);

        if any(DocumentStatus::Extracting) {
            Some(PipelineStage::Extracting)
        } else if any(DocumentStatus::Classifying) {
            Some(PipelineStage::Classifying)
        } else if any(DocumentStatus::Parsing) {
            Some(PipelineStage::Parsing)
        } else if any(DocumentStatus::BuildingFhir) {
            Some(PipelineStage::BuildingFhir)
        } else if any(DocumentStatus::Validating) {
            Some(PipelineStage::Validating)
        } else if self.is_terminal() {
            Some(PipelineStage::Done)
        } else {
            None
        }
    }
}

/// Row of the job history listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub use_case: UseCase,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub document_count: u32,
    #[serde(default)]
    pub avg_confidence: Option<f64>,
}

/// Aggregate job status
///
/// `Completed` and `Failed` are terminal. Anything the service reports beyond
/// the four known values is carried through in `Other`; no transition policy
/// is assumed for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "queued" => JobStatus::Queued,
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        JobStatus::from(raw.as_str())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business flow a job was uploaded for
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UseCase {
    #[default]
    ClaimSubmission,
    PreAuthorisation,
    Other(String),
}

impl UseCase {
    pub fn as_str(&self) -> &str {
        match self {
            UseCase::ClaimSubmission => "claim_submission",
            UseCase::PreAuthorisation => "pre_authorisation",
            UseCase::Other(raw) => raw,
        }
    }
}

impl From<&str> for UseCase {
    fn from(raw: &str) -> Self {
        match raw {
            "claim_submission" => UseCase::ClaimSubmission,
            "pre_authorisation" => UseCase::PreAuthorisation,
            other => UseCase::Other(other.to_string()),
        }
    }
}

impl From<String> for UseCase {
    fn from(raw: String) -> Self {
        UseCase::from(raw.as_str())
    }
}

impl From<UseCase> for String {
    fn from(use_case: UseCase) -> Self {
        match use_case {
            UseCase::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion pipeline stage inferred from document statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    Extracting,
    Classifying,
    Parsing,
    BuildingFhir,
    Validating,
    Done,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 6] = [
        PipelineStage::Extracting,
        PipelineStage::Classifying,
        PipelineStage::Parsing,
        PipelineStage::BuildingFhir,
        PipelineStage::Validating,
        PipelineStage::Done,
    ];

    /// Zero-based position in the pipeline
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Extracting => "Extracting text",
            PipelineStage::Classifying => "Classifying documents",
            PipelineStage::Parsing => "Parsing clinical data",
            PipelineStage::BuildingFhir => "Building FHIR bundle",
            PipelineStage::Validating => "Validating",
            PipelineStage::Done => "Done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
