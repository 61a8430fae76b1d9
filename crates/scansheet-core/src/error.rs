//! Error types module
//!
//! Every stage of the upload pipeline converts its own failures into one of
//! these variants; nothing else crosses the transport-client boundary. The
//! enum message carries internal detail for logs, `client_message()` yields
//! the human-readable text shown to the user.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error (status {status}): {reason}")]
    Server { status: u16, reason: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Data extraction error: {0}")]
    DataExtraction(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Protocol(format!("JSON parsing error: {}", err))
    }
}

impl AppError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::ImageProcessing(_) => "ImageProcessing",
            AppError::Encryption(_) => "Encryption",
            AppError::Decryption(_) => "Decryption",
            AppError::Network(_) => "Network",
            AppError::Server { .. } => "Server",
            AppError::Protocol(_) => "Protocol",
            AppError::DataExtraction(_) => "DataExtraction",
            AppError::Storage(_) => "Storage",
            AppError::Config(_) => "Config",
        }
    }

    /// Client-facing message (may differ from internal error message)
    pub fn client_message(&self) -> String {
        match self {
            AppError::ImageProcessing(_) => "Failed to process the images".to_string(),
            AppError::Encryption(_) => "Failed to encrypt the request data".to_string(),
            AppError::Decryption(_) => "Failed to decrypt data from the server".to_string(),
            AppError::Network(ref msg) => format!("Connection error: {}", msg),
            AppError::Server { reason, .. } => reason.clone(),
            AppError::Protocol(_) => "Server response is in an invalid format".to_string(),
            AppError::DataExtraction(ref msg) => msg.clone(),
            AppError::Storage(_) => "Failed to save the CSV file".to_string(),
            AppError::Config(ref msg) => msg.clone(),
        }
    }
}
