//! Document upload

use reqwest::multipart::{Form, Part};
use std::path::Path;

use crate::ClinIqClient;
use crate::error::{ClientError, Result};
use cliniq_core::domain::job::UseCase;
use cliniq_core::dto::upload::UploadResponse;

/// File extensions the service accepts
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "zip"];

/// A file to upload, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, using its file name for the upload
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        Ok(Self { filename, bytes })
    }

    /// Lower-cased extension, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Whether the service accepts this file type (PDF or ZIP of PDFs)
    pub fn is_supported(&self) -> bool {
        self.extension()
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }

    fn mime_type(&self) -> &'static str {
        match self.extension().as_deref() {
            Some("zip") => "application/zip",
            _ => "application/pdf",
        }
    }
}

impl ClinIqClient {
    /// Upload documents and start a processing job
    ///
    /// Files are sent as one multipart request: a `use_case` field plus one
    /// `files` part per file.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidRequest`] without contacting the service
    /// if `files` is empty or contains anything other than PDF or ZIP files.
    pub async fn upload_documents(
        &self,
        use_case: &UseCase,
        files: Vec<UploadFile>,
    ) -> Result<UploadResponse> {
        validate_upload(&files)?;

        let mut form = Form::new().text("use_case", use_case.as_str().to_string());
        for file in files {
            let mime = file.mime_type();
            let part = Part::bytes(file.bytes)
                .file_name(file.filename)
                .mime_str(mime)?;
            form = form.part("files", part);
        }

        let url = self.api_url("/upload");
        let response = self.client.post(&url).multipart(form).send().await?;

        self.handle_response(response).await
    }
}

fn validate_upload(files: &[UploadFile]) -> Result<()> {
    if files.is_empty() {
        return Err(ClientError::InvalidRequest("No files to upload".to_string()));
    }

    let unsupported: Vec<&str> = files
        .iter()
        .filter(|f| !f.is_supported())
        .map(|f| f.filename.as_str())
        .collect();

    if !unsupported.is_empty() {
        return Err(ClientError::InvalidRequest(format!(
            "Only PDF or ZIP files are supported: {}",
            unsupported.join(", ")
        )));
    }

    Ok(())
}
