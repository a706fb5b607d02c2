//! Upload DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobStatus;

/// Response of `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub job_id: String,
    pub document_count: u32,
    pub status: JobStatus,
}
