//! Document-related API endpoints

use crate::ClinIqClient;
use crate::download::DownloadedBundle;
use crate::error::Result;
use cliniq_core::domain::audit::AuditEntry;
use cliniq_core::domain::document::ExtractedFields;
use cliniq_core::domain::validation::ValidationReport;
use cliniq_core::dto::document::{AbdmSubmission, ValidateResponse};

impl ClinIqClient {
    // =============================================================================
    // Extracted Data (Clinical Review)
    // =============================================================================

    /// Get the fields the service extracted from a document
    pub async fn get_extracted(&self, document_id: &str) -> Result<ExtractedFields> {
        let url = self.api_url(&format!("/documents/{}/extracted", document_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Partially update a document's extracted fields
    ///
    /// # Arguments
    /// * `document_id` - The document identifier
    /// * `fields` - Fields to change; keys not present are left alone
    ///
    /// # Returns
    /// The updated field map as stored by the service
    pub async fn patch_extracted(
        &self,
        document_id: &str,
        fields: &ExtractedFields,
    ) -> Result<ExtractedFields> {
        let url = self.api_url(&format!("/documents/{}/extracted", document_id));
        let response = self.client.patch(&url).json(fields).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Validation
    // =============================================================================

    /// Ask the service to validate a document's FHIR bundle
    pub async fn trigger_validation(&self, document_id: &str) -> Result<ValidateResponse> {
        let url = self.api_url(&format!("/documents/{}/validate", document_id));
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the latest validation report for a document
    pub async fn get_validation_report(&self, document_id: &str) -> Result<ValidationReport> {
        let url = self.api_url(&format!("/documents/{}/validation", document_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // FHIR Export
    // =============================================================================

    /// Get a document's FHIR resource as JSON
    pub async fn get_document_fhir(&self, document_id: &str) -> Result<serde_json::Value> {
        let url = self.api_url(&format!("/documents/{}/fhir", document_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Download a document's FHIR bundle as a file
    pub async fn download_document_bundle(&self, document_id: &str) -> Result<DownloadedBundle> {
        let url = self.api_url(&format!("/documents/{}/fhir/download", document_id));
        let response = self.client.get(&url).send().await?;

        DownloadedBundle::from_response(response, format!("{}_fhir_bundle.json", document_id))
            .await
    }

    /// Submit a document's bundle to the ABDM registry
    ///
    /// # Returns
    /// The submission status and the ABHA reference assigned by the registry
    pub async fn submit_to_abdm(&self, document_id: &str) -> Result<AbdmSubmission> {
        let url = self.api_url(&format!("/documents/{}/submit-abdm", document_id));
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Audit Trail
    // =============================================================================

    /// Get the ordered change history of a document
    pub async fn get_audit_log(&self, document_id: &str) -> Result<Vec<AuditEntry>> {
        let url = self.api_url(&format!("/documents/{}/audit", document_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
