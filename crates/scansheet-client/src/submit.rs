//! The upload pipeline
//!
//! Single-shot sequence: re-encode images as JPEG, build the plaintext
//! payload, seal it, POST, map the status, open the returned table,
//! flatten it, and persist the CSV. Every stage converts its own failures;
//! `submit` itself never returns a Rust error.

use crate::{failure_for_status, ApiClient, PROCESS_IMAGE_PATH};
use base64::{engine::general_purpose, Engine as _};
use chrono::Local;
use scansheet_core::{AppError, CsvFileInfo, UploadOutcome};
use scansheet_processing::{
    export_filename, flatten, reencode_all_jpeg, CsvRecord, CSV_CONTENT_TYPE,
};
use scansheet_storage::ExportStore;

/// Decrypted request plaintext.
#[derive(Debug, serde::Serialize)]
struct UploadPayload {
    image_bytes: Vec<String>,
    title: String,
}

/// Outer HTTP request body.
#[derive(Debug, serde::Serialize)]
struct EncryptedRequest {
    payload: String,
}

/// Outer HTTP response body; `table` is required on success.
#[derive(Debug, serde::Deserialize)]
struct EncryptedResponse {
    #[serde(default)]
    table: Option<String>,
}

impl ApiClient {
    /// Submit an ordered batch of form images for processing.
    ///
    /// Returns exactly one terminal outcome per call; failures surface as
    /// `UploadOutcome::Failed` with a user-facing message.
    pub async fn submit(
        &self,
        images: Vec<Vec<u8>>,
        form_tag: &str,
        store: &dyn ExportStore,
    ) -> UploadOutcome {
        tracing::debug!(images = images.len(), form_tag, "starting upload submission");

        match self.submit_inner(images, form_tag, store).await {
            Ok(info) => {
                tracing::info!(file = %info.name, handle = %info.handle, "upload succeeded");
                UploadOutcome::Succeeded(info)
            }
            Err(e) => {
                tracing::warn!(kind = e.error_type(), error = %e, "upload failed");
                UploadOutcome::Failed(e.client_message())
            }
        }
    }

    async fn submit_inner(
        &self,
        images: Vec<Vec<u8>>,
        form_tag: &str,
        store: &dyn ExportStore,
    ) -> Result<CsvFileInfo, AppError> {
        if images.is_empty() {
            return Err(AppError::ImageProcessing("No images to submit".to_string()));
        }

        let jpegs = reencode_all_jpeg(images).await?;

        let payload = UploadPayload {
            image_bytes: jpegs
                .iter()
                .map(|j| general_purpose::STANDARD.encode(j))
                .collect(),
            title: form_tag.to_string(),
        };
        let plaintext = serde_json::to_vec(&payload)?;
        let sealed = self.crypto.seal_to_base64(&plaintext)?;

        let response = self
            .client
            .post(self.build_url(PROCESS_IMAGE_PATH))
            .header("Authorization", &self.auth_token)
            .json(&EncryptedRequest { payload: sealed })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Server {
                status: status.as_u16(),
                reason: failure_for_status(status.as_u16()),
            });
        }

        let body: EncryptedResponse = response
            .json()
            .await
            .map_err(|e| AppError::Protocol(format!("Failed to parse response body: {}", e)))?;
        let table = body
            .table
            .ok_or_else(|| AppError::Protocol("Response lacks a table field".to_string()))?;

        let decrypted = self.crypto.open_from_base64(&table)?;
        let raw_table = String::from_utf8(decrypted)
            .map_err(|e| AppError::Decryption(format!("Invalid UTF-8 in decrypted data: {}", e)))?;

        let flattened = flatten(&raw_table)?;
        if flattened.is_empty() {
            return Err(AppError::DataExtraction(
                "No data could be extracted from the response".to_string(),
            ));
        }

        let record = CsvRecord::from_table(&flattened);
        let filename = export_filename(Local::now());
        let info = store
            .persist(&filename, CSV_CONTENT_TYPE, record.to_csv_string().into_bytes())
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        Ok(info)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Network("request timed out".to_string())
    } else {
        AppError::Network(e.to_string())
    }
}
