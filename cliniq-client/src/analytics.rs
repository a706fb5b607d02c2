//! Analytics API endpoints

use crate::ClinIqClient;
use crate::error::Result;
use cliniq_core::domain::analytics::AnalyticsSummary;

impl ClinIqClient {
    /// Get aggregate processing statistics
    pub async fn get_analytics_summary(&self) -> Result<AnalyticsSummary> {
        let url = self.api_url("/analytics/summary");
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
