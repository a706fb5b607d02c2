//! Validation report types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// NHCX validation report for a document's FHIR bundle
///
/// Individual issues and checklist items are kept as raw JSON; their shape is
/// owned by the validator running inside the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub document_id: String,
    #[serde(default)]
    pub bundle_health_score: f64,
    #[serde(default)]
    pub errors: Vec<Value>,
    #[serde(default)]
    pub warnings: Vec<Value>,
    #[serde(default)]
    pub info: Vec<Value>,
    #[serde(default)]
    pub nhcx_compliance_checklist: Vec<Value>,
    #[serde(default)]
    pub raw_report: Value,
}

impl ValidationReport {
    /// Whether the bundle passed validation
    ///
    /// The validator's own verdict wins: a `status` string in `raw_report`
    /// passes only when it is `"ok"`. Reports without one pass when they
    /// list no errors.
    pub fn passed(&self) -> bool {
        match self.raw_report.get("status").and_then(Value::as_str) {
            Some(status) => status.eq_ignore_ascii_case("ok"),
            None => self.errors.is_empty(),
        }
    }

    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.info.len()
    }
}

/// Human-readable text for a single issue entry
///
/// Issues are usually objects with a `message` (or `diagnostics`) field;
/// anything else is rendered as compact JSON.
pub fn issue_message(issue: &Value) -> String {
    match issue {
        Value::String(text) => text.clone(),
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("diagnostics"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| issue.to_string()),
        other => other.to_string(),
    }
}
