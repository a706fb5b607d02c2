//! Analytics summary types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate processing statistics across all jobs
///
/// Unlike per-job confidences, which are fractions in `0..=1`, the averages
/// here arrive already scaled to percent (`87.5` means 87.5%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSummary {
    pub total_documents: u64,
    pub total_jobs: u64,
    /// Mean document confidence, in percent
    pub avg_confidence: f64,
    pub avg_processing_time_seconds: f64,
    /// Share of validated documents whose report status is `ok`, in percent
    pub validation_pass_rate: f64,
    pub doc_type_breakdown: BTreeMap<String, u64>,
    pub time_saved_minutes: f64,
    pub status_breakdown: BTreeMap<String, u64>,
}
