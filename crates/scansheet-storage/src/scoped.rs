//! Scoped store (modern capability tier)
//!
//! Persists exports by registering a row in the managed file index first,
//! then writing the bytes through the path the registration produced.
//! Registration failure or write failure fails the persist outright, and a
//! failed write drops the registration again; the rest of the pipeline
//! never sees a half-visible export.

use crate::index::{Collection, FileIndex, IndexEntry};
use crate::traits::{ExportStore, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use scansheet_core::config::EXPORT_SUBFOLDER;
use scansheet_core::{CsvFileInfo, StoreBackend};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Clone)]
pub struct ScopedStore {
    index: FileIndex,
}

impl ScopedStore {
    pub fn new(index: FileIndex) -> Self {
        ScopedStore { index }
    }
}

#[async_trait]
impl ExportStore for ScopedStore {
    async fn persist(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<CsvFileInfo> {
        let relative_path = format!("{}/{}", EXPORT_SUBFOLDER, filename);
        let entry = IndexEntry {
            id: Uuid::new_v4(),
            display_name: filename.to_string(),
            size_bytes: data.len() as u64,
            created_at: Utc::now().timestamp(),
            relative_path: relative_path.clone(),
            mime_type: content_type.to_string(),
            collection: Collection::Downloads,
        };

        // Register first, then write through the obtained handle.
        self.index
            .insert(entry.clone())
            .await
            .map_err(|e| StorageError::RegisterFailed(format!("Index insert failed: {}", e)))?;

        let path = self.index.root().join(&relative_path);
        if let Err(e) = write_through(&path, &data).await {
            // A failed write must not leave the registration behind.
            if let Err(cleanup) = self.index.remove(entry.id).await {
                tracing::warn!(
                    handle = %entry.handle(),
                    error = %cleanup,
                    "failed to drop index row after write failure"
                );
            }
            return Err(e);
        }

        tracing::info!(
            path = %path.display(),
            handle = %entry.handle(),
            size_bytes = entry.size_bytes,
            "scoped store persist successful"
        );

        Ok(entry.to_file_info())
    }

    fn backend_type(&self) -> StoreBackend {
        StoreBackend::Scoped
    }
}

async fn write_through(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(path).await.map_err(|e| {
        StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    file.write_all(data).await.map_err(|e| {
        StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
    })?;
    file.sync_all().await.map_err(|e| {
        StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
    })?;
    Ok(())
}
