//! Document action DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::timestamp;

/// Response of `POST /api/documents/{id}/validate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateResponse {
    #[serde(default)]
    pub status: String,
}

/// Response of `POST /api/documents/{id}/submit-abdm`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbdmSubmission {
    pub status: String,
    pub abha_reference: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}
