//! ClinIQ HTTP Client
//!
//! A type-safe async client for the ClinIQ document-processing API.
//!
//! The service turns uploaded clinical documents into FHIR bundles. This
//! crate covers the HTTP boundary: uploads, job history, extracted-data
//! review, validation, FHIR export, ABDM submission, audit trail and
//! analytics, plus a poller that waits for a job to finish.
//!
//! # Example
//!
//! ```no_run
//! use cliniq_client::{ClinIqClient, PollOptions, UploadFile};
//! use cliniq_core::domain::job::UseCase;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ClinIqClient::new("http://localhost:8000");
//!
//!     let file = UploadFile::from_path("discharge.pdf").await?;
//!     let upload = client
//!         .upload_documents(&UseCase::ClaimSubmission, vec![file])
//!         .await?;
//!
//!     let job = client
//!         .poll_job(&upload.job_id, PollOptions::default(), |job| {
//!             println!("{}: {}", job.id, job.status);
//!         })
//!         .await?;
//!
//!     println!("Job finished with status {}", job.status);
//!     Ok(())
//! }
//! ```

mod analytics;
mod documents;
pub mod download;
pub mod error;
mod jobs;
pub mod poller;
pub mod upload;

// Re-export commonly used types
pub use download::DownloadedBundle;
pub use error::{ClientError, Result};
pub use poller::{JobPoller, JobSource, PollOptions};
pub use upload::UploadFile;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// HTTP client for the ClinIQ API
///
/// This client provides methods for all API endpoints, organized into
/// logical groups:
/// - Upload and job history
/// - Extracted data review and validation
/// - FHIR export and ABDM submission
/// - Audit trail and analytics
#[derive(Debug, Clone)]
pub struct ClinIqClient {
    /// Base URL of the service (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ClinIqClient {
    /// Create a new ClinIQ client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service, without the `/api` suffix
    ///
    /// # Example
    /// ```
    /// use cliniq_client::ClinIqClient;
    ///
    /// let client = ClinIqClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new ClinIQ client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use cliniq_client::ClinIqClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ClinIqClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an absolute API URL from a path below `/api`
    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success responses become [`ClientError::ApiError`] carrying the
    /// server's `detail` message.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Return the response untouched if it succeeded, or the mapped API error
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::debug!("Request failed with status {}: {}", status, message);

        Err(ClientError::api_error(status.as_u16(), message))
    }
}

/// Extract a human-readable error message from a failed response body
///
/// Preference order: the JSON `detail` field, then `"API error {status}"`
/// for JSON bodies without one, then the HTTP status text when the body is
/// not JSON at all.
fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("API error {}", status.as_u16());

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
            Some(Value::String(_)) | Some(Value::Null) | None => fallback(),
            Some(other) => other.to_string(),
        },
        Ok(_) => fallback(),
        Err(_) => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(fallback),
    }
}
