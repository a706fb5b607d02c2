//! Job poller
//!
//! Watches a job on a fixed cadence until it completes or fails. Each
//! attempt fetches the job once and reports it to a progress callback;
//! the loop ends on a terminal status, on the first request error, or when
//! the attempt budget runs out.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::ClinIqClient;
use crate::error::{ClientError, Result};
use cliniq_core::domain::job::JobDetail;

/// Default delay between two fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Default number of fetches before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Anything that can report the current state of a job
///
/// Implemented by [`ClinIqClient`] over HTTP. Other transports (or test
/// doubles) can be plugged into [`JobPoller`] through this trait.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch the current detail representation of a job
    async fn fetch_job(&self, job_id: &str) -> Result<JobDetail>;
}

#[async_trait]
impl JobSource for ClinIqClient {
    async fn fetch_job(&self, job_id: &str) -> Result<JobDetail> {
        self.get_job(job_id).await
    }
}

#[async_trait]
impl<T: JobSource + ?Sized> JobSource for &T {
    async fn fetch_job(&self, job_id: &str) -> Result<JobDetail> {
        (**self).fetch_job(job_id).await
    }
}

#[async_trait]
impl<T: JobSource + ?Sized> JobSource for Arc<T> {
    async fn fetch_job(&self, job_id: &str) -> Result<JobDetail> {
        (**self).fetch_job(job_id).await
    }
}

/// Poll cadence and budget
///
/// A job that never finishes costs `max_attempts` fetches and
/// `max_attempts * interval` of waiting before the timeout is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Fixed delay between the end of one attempt and the next fetch
    pub interval: Duration,
    /// Maximum number of fetches
    pub max_attempts: u32,
}

impl PollOptions {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Both the interval and the attempt count must be positive
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(ClientError::InvalidRequest(
                "poll interval must be greater than 0".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(ClientError::InvalidRequest(
                "max attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Fixed-delay job poller
///
/// Holds no state between calls, so one poller can drive any number of
/// concurrent polls.
pub struct JobPoller<S> {
    source: S,
    options: PollOptions,
}

impl<S: JobSource> JobPoller<S> {
    /// Creates a new job poller
    pub fn new(source: S, options: PollOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &PollOptions {
        &self.options
    }

    /// Poll until the job is terminal, without progress reporting
    pub async fn wait(&self, job_id: &str) -> Result<JobDetail> {
        self.poll(job_id, |_| {}).await
    }

    /// Poll a job until it reaches `completed` or `failed`
    ///
    /// `on_progress` sees every fetched state, in fetch order, including the
    /// terminal one.
    ///
    /// # Errors
    /// - [`ClientError::InvalidRequest`] if the options are not positive
    /// - any fetch error, unchanged, as soon as it happens
    /// - [`ClientError::PollTimeout`] after `max_attempts` non-terminal fetches
    pub async fn poll<F>(&self, job_id: &str, mut on_progress: F) -> Result<JobDetail>
    where
        F: FnMut(&JobDetail),
    {
        self.options.validate()?;

        let max_attempts = self.options.max_attempts;

        for attempt in 1..=max_attempts {
            debug!(
                "Polling job {} (attempt {}/{})",
                job_id, attempt, max_attempts
            );

            let job = self.source.fetch_job(job_id).await?;
            on_progress(&job);

            if job.is_terminal() {
                info!(
                    "Job {} reached status {} after {} attempt(s)",
                    job_id, job.status, attempt
                );
                return Ok(job);
            }

            tokio::time::sleep(self.options.interval).await;
        }

        warn!(
            "Gave up polling job {} after {} attempt(s)",
            job_id, max_attempts
        );

        Err(ClientError::PollTimeout {
            job_id: job_id.to_string(),
            attempts: max_attempts,
        })
    }
}
