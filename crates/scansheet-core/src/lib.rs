//! ScanSheet Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and
//! the authenticated-encryption codec shared across all ScanSheet components.

pub mod config;
pub mod encryption;
pub mod error;
pub mod models;
pub mod store_backend;

// Re-export commonly used types
pub use config::Config;
pub use encryption::EncryptionService;
pub use error::AppError;
pub use models::{CsvFileInfo, UploadOutcome};
pub use store_backend::StoreBackend;
