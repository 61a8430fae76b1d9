//! Configuration module
//!
//! Environment-driven configuration for the upload client and the export
//! store. The encryption key is deliberately part of the configuration
//! rather than a compiled-in constant: key provisioning is an injected
//! external concern.

use std::env;
use std::path::PathBuf;

use crate::store_backend::StoreBackend;

/// Total call budget for one upload request (connect, write, read).
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 120;

/// Subfolder of the export root where CSV files land.
pub const EXPORT_SUBFOLDER: &str = "Download/ScanSheet";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the image-processing API.
    pub api_url: String,
    /// Pre-shared authorization token, sent verbatim in the Authorization header.
    pub auth_token: String,
    /// Base64-encoded 32-byte AES key.
    pub encryption_key: String,
    /// Root directory under which exports and the file index live.
    pub export_root: PathBuf,
    /// Explicit backend override; `None` means probe at startup.
    pub storage_backend: Option<StoreBackend>,
    /// Total HTTP call budget in seconds.
    pub call_timeout_secs: u64,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Required: `SCANSHEET_API_URL`, `SCANSHEET_AUTH_TOKEN`,
    /// `SCANSHEET_ENCRYPTION_KEY`. Optional: `SCANSHEET_EXPORT_ROOT`
    /// (default `./Download`), `SCANSHEET_STORAGE_BACKEND`
    /// (`scoped`/`legacy`), `SCANSHEET_CALL_TIMEOUT_SECS` (default 120).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let api_url = env::var("SCANSHEET_API_URL")
            .map_err(|_| anyhow::anyhow!("SCANSHEET_API_URL environment variable not set"))?;

        let auth_token = env::var("SCANSHEET_AUTH_TOKEN")
            .map_err(|_| anyhow::anyhow!("SCANSHEET_AUTH_TOKEN environment variable not set"))?;

        let encryption_key = env::var("SCANSHEET_ENCRYPTION_KEY").map_err(|_| {
            anyhow::anyhow!("SCANSHEET_ENCRYPTION_KEY environment variable not set")
        })?;

        let export_root = env::var("SCANSHEET_EXPORT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./Download"));

        let storage_backend = match env::var("SCANSHEET_STORAGE_BACKEND") {
            Ok(s) => Some(s.parse::<StoreBackend>()?),
            Err(_) => None,
        };

        let call_timeout_secs = env::var("SCANSHEET_CALL_TIMEOUT_SECS")
            .ok()
            .map(|s| s.parse::<u64>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid SCANSHEET_CALL_TIMEOUT_SECS: {}", e))?
            .unwrap_or(DEFAULT_CALL_TIMEOUT_SECS);

        Ok(Config {
            api_url,
            auth_token,
            encryption_key,
            export_root,
            storage_backend,
            call_timeout_secs,
        })
    }
}
