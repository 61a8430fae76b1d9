//! Legacy store (direct-write capability tier)
//!
//! Writes the export straight to the target directory, then asks the file
//! index for a rescan so the new file becomes discoverable. The rescan is
//! awaited but best-effort: its result is logged and never inspected for
//! the persist outcome. The returned descriptor wraps the raw path in a
//! shareable `file://` handle.

use crate::index::{Collection, FileIndex};
use crate::traits::{ExportStore, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use scansheet_core::config::EXPORT_SUBFOLDER;
use scansheet_core::{CsvFileInfo, StoreBackend};
use tokio::fs;

#[derive(Clone)]
pub struct LegacyStore {
    index: FileIndex,
}

impl LegacyStore {
    pub fn new(index: FileIndex) -> Self {
        LegacyStore { index }
    }
}

#[async_trait]
impl ExportStore for LegacyStore {
    async fn persist(
        &self,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<CsvFileInfo> {
        let dir = self.index.root().join(EXPORT_SUBFOLDER);
        fs::create_dir_all(&dir).await?;

        let path = dir.join(filename);
        let size = data.len() as u64;
        fs::write(&path, &data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        // Best-effort rescan so the file shows up in index queries. The
        // persist result does not depend on it.
        match self.index.rescan(EXPORT_SUBFOLDER, Collection::Files).await {
            Ok(added) => tracing::debug!(added, "legacy store rescan finished"),
            Err(e) => tracing::warn!(error = %e, "legacy store rescan failed"),
        }

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            "legacy store persist successful"
        );

        Ok(CsvFileInfo {
            handle: format!("file://{}", path.display()),
            name: filename.to_string(),
            size_bytes: size,
            created_at: Utc::now(),
        })
    }

    fn backend_type(&self) -> StoreBackend {
        StoreBackend::Legacy
    }
}
