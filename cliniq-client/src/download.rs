//! FHIR bundle downloads

use reqwest::header::CONTENT_DISPOSITION;

use crate::ClinIqClient;
use crate::error::Result;

/// A file returned by one of the FHIR download endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedBundle {
    /// Suggested file name, from `Content-Disposition` when the server sends one
    pub filename: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl DownloadedBundle {
    /// Read a download response, checking the status first
    pub(crate) async fn from_response(
        response: reqwest::Response,
        default_filename: String,
    ) -> Result<Self> {
        let response = ClinIqClient::check_status(response).await?;

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or(default_filename);

        let bytes = response.bytes().await?.to_vec();

        Ok(Self { filename, bytes })
    }

    /// Parse the contents as JSON
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.bytes)
    }
}

/// Extract the `filename` parameter of a `Content-Disposition` header
///
/// Directory components are stripped so the name is safe to write locally.
fn filename_from_disposition(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }

        let value = value.trim().trim_matches('"');
        let name = value.rsplit(['/', '\\']).next().unwrap_or(value);
        (!matches!(name, "" | "." | "..")).then(|| name.to_string())
    })
}
