//! HTTP client for the ScanSheet processing API.
//!
//! One entry point matters: [`ApiClient::submit`] runs the whole upload
//! pipeline (JPEG re-encode, encrypt, POST, decrypt, flatten, persist) and
//! folds every failure into a terminal [`UploadOutcome`]. The CLI uses
//! this client directly.

pub mod submit;

use scansheet_core::{AppError, Config, EncryptionService};
use std::time::Duration;

/// Path of the processing endpoint, relative to the base URL.
pub const PROCESS_IMAGE_PATH: &str = "/process-image";

/// HTTP client with the pre-shared auth token and the payload codec.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
    crypto: EncryptionService,
}

impl ApiClient {
    /// Create a client with one timeout budget covering connect, write,
    /// and read. There are no retries.
    pub fn new(
        base_url: String,
        auth_token: String,
        crypto: EncryptionService,
        call_timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(call_timeout)
            .connect_timeout(call_timeout)
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            crypto,
        })
    }

    /// Create a client from application configuration; the encryption key
    /// is decoded here and injected into the codec.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let crypto = EncryptionService::from_base64_key(&config.encryption_key)?;
        Self::new(
            config.api_url.clone(),
            config.auth_token.clone(),
            crypto,
            Duration::from_secs(config.call_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Map a non-success HTTP status to its user-facing failure reason.
pub fn failure_for_status(status: u16) -> String {
    match status {
        400 => "Submitted data is invalid".to_string(),
        401 => "Unauthorized. Check the credentials".to_string(),
        403 => "Access denied".to_string(),
        404 => "Service not found".to_string(),
        500..=599 => "Internal server error".to_string(),
        other => format!("Server error (code {})", other),
    }
}
