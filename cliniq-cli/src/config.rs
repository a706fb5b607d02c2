//! Configuration module
//!
//! Handles CLI configuration: service URL and job polling cadence.

use anyhow::{Result, bail};
use cliniq_client::{ClinIqClient, PollOptions};
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the ClinIQ service
    pub api_url: String,

    /// Delay between two job status requests
    pub poll_interval: Duration,

    /// Number of status requests before giving up on a job
    pub max_attempts: u32,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            bail!("api_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            bail!("poll interval must be greater than 0");
        }

        if self.max_attempts == 0 {
            bail!("max attempts must be greater than 0");
        }

        Ok(())
    }

    /// Poll settings for waiting on jobs
    pub fn poll_options(&self) -> PollOptions {
        PollOptions::new(self.poll_interval, self.max_attempts)
    }

    /// Client for the configured service
    pub fn client(&self) -> ClinIqClient {
        ClinIqClient::new(&self.api_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        let poll = PollOptions::default();
        Self {
            api_url: "http://localhost:8000".to_string(),
            poll_interval: poll.interval,
            max_attempts: poll.max_attempts,
        }
    }
}
