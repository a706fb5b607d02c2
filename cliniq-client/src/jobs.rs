//! Job-related API endpoints

use crate::ClinIqClient;
use crate::download::DownloadedBundle;
use crate::error::Result;
use crate::poller::{JobPoller, PollOptions};
use cliniq_core::domain::job::JobDetail;
use cliniq_core::dto::job::{JobPage, ListJobsQuery};

impl ClinIqClient {
    // =============================================================================
    // Job History
    // =============================================================================

    /// List one page of the job history
    ///
    /// # Arguments
    /// * `query` - Page number (1-based) and page size
    ///
    /// # Returns
    /// The requested page plus the total number of jobs
    pub async fn list_jobs(&self, query: ListJobsQuery) -> Result<JobPage> {
        let url = self.api_url("/jobs");
        let response = self.client.get(&url).query(&query).send().await?;

        self.handle_response(response).await
    }

    /// Get a job by ID, including its documents
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    pub async fn get_job(&self, job_id: &str) -> Result<JobDetail> {
        let url = self.api_url(&format!("/jobs/{}", job_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Job Progress
    // =============================================================================

    /// Poll a job until it completes or fails
    ///
    /// Calls `on_progress` with every fetched state, in order. See
    /// [`JobPoller::poll`] for the exact termination rules.
    ///
    /// # Example
    /// ```no_run
    /// # use cliniq_client::{ClinIqClient, PollOptions};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ClinIqClient::new("http://localhost:8000");
    /// let job = client
    ///     .poll_job("job-1", PollOptions::default(), |job| {
    ///         println!("status: {}", job.status);
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn poll_job<F>(
        &self,
        job_id: &str,
        options: PollOptions,
        on_progress: F,
    ) -> Result<JobDetail>
    where
        F: FnMut(&JobDetail),
    {
        JobPoller::new(self, options)
            .poll(job_id, on_progress)
            .await
    }

    // =============================================================================
    // Job Export
    // =============================================================================

    /// Download the combined NHCX claim bundle for a job
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    pub async fn download_job_bundle(&self, job_id: &str) -> Result<DownloadedBundle> {
        let url = self.api_url(&format!("/jobs/{}/fhir/bundle", job_id));
        let response = self.client.get(&url).send().await?;

        DownloadedBundle::from_response(response, format!("{}_nhcx_claim_bundle.json", job_id))
            .await
    }
}
