//! ScanSheet Storage Library
//!
//! Capability-tiered persistence for exported CSV files, plus the catalog
//! that discovers previously exported files.
//!
//! # Backends
//!
//! - **Scoped** (modern tier): an entry is registered in the managed file
//!   index first, then the bytes are written through the handle the
//!   registration produced. Either both steps succeed or the persist
//!   fails outright.
//! - **Legacy** (fallback tier): the file is written directly, then the
//!   index is asked for a best-effort rescan. The rescan is awaited but
//!   its result never fails the persist.
//!
//! The index itself is a JSON manifest at the export root recording
//! {id, display name, size, creation time, relative path, collection};
//! catalog queries run against it.

pub mod catalog;
pub mod factory;
pub mod index;
pub mod legacy;
pub mod scoped;
pub mod traits;

// Re-export commonly used types
pub use catalog::{DeleteFailure, DeleteReport, ExportCatalog};
pub use factory::{create_catalog, create_store};
pub use index::{Collection, FileIndex, IndexEntry};
pub use legacy::LegacyStore;
pub use scansheet_core::StoreBackend;
pub use scoped::ScopedStore;
pub use traits::{ExportStore, StorageError, StorageResult};
