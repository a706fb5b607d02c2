//! Error types for the ClinIQ client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the ClinIQ client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// `detail` message from the API, or the status text
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request rejected locally, nothing was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Job did not reach a terminal status within the attempt budget
    #[error("Polling timed out: job {job_id} not finished after {attempts} attempt(s)")]
    PollTimeout {
        /// Job being polled
        job_id: String,
        /// Number of fetches performed
        attempts: u32,
    },
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Check if this error is a poll timeout rather than a request failure
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::PollTimeout { .. })
    }

    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let not_found = ClientError::api_error(404, "Job not found");
        assert!(not_found.is_not_found());
        assert!(not_found.is_client_error());
        assert!(!not_found.is_server_error());
        assert!(!not_found.is_timeout());

        let unavailable = ClientError::api_error(503, "Service Unavailable");
        assert!(unavailable.is_server_error());
        assert!(!unavailable.is_client_error());
    }

    #[test]
    fn test_timeout_is_distinct() {
        let err = ClientError::PollTimeout {
            job_id: "job-1".to_string(),
            attempts: 3,
        };
        assert!(err.is_timeout());
        assert!(!err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Polling timed out: job job-1 not finished after 3 attempt(s)"
        );
    }

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ClientError::api_error(400, "Only PDF or ZIP files are supported");
        assert_eq!(err.user_message(), "Only PDF or ZIP files are supported");
    }
}
