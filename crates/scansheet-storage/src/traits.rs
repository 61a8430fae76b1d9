//! Storage abstraction trait
//!
//! This module defines the ExportStore trait that both capability-tier
//! backends implement, keeping the CSV materializer backend-agnostic.

use async_trait::async_trait;
use scansheet_core::{CsvFileInfo, StoreBackend};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Register failed: {0}")]
    RegisterFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence seam for exported CSV files.
///
/// Both backends take the finished file content; how the file becomes
/// visible to the rest of the system (index registration vs. direct write
/// plus rescan) is the backend's concern.
#[async_trait]
pub trait ExportStore: Send + Sync {
    /// Persist a finished export and return its descriptor.
    async fn persist(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<CsvFileInfo>;

    /// Get the storage backend tier
    fn backend_type(&self) -> StoreBackend;
}
