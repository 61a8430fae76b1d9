//! Export catalog
//!
//! Read path over previously exported CSV files: a primary query scoped to
//! the downloads collection, a broader fallback when the primary comes back
//! empty, and sequential best-effort batch deletion.

use crate::index::{parse_handle, Collection, FileIndex};
use crate::traits::{StorageError, StorageResult};
use scansheet_core::CsvFileInfo;
use tokio::fs;

/// Outcome of a batch delete: per-item failures never abort the batch.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct DeleteReport {
    pub deleted: usize,
    pub failures: Vec<DeleteFailure>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct DeleteFailure {
    pub handle: String,
    pub reason: String,
}

#[derive(Clone)]
pub struct ExportCatalog {
    index: FileIndex,
}

impl ExportCatalog {
    pub fn new(index: FileIndex) -> Self {
        ExportCatalog { index }
    }

    /// List exported CSV files, newest first.
    ///
    /// Tries the downloads-scoped query first; when it yields zero rows the
    /// broader search runs instead.
    pub async fn list(&self) -> StorageResult<Vec<CsvFileInfo>> {
        let rows = self
            .index
            .query(Some(Collection::Downloads), ".csv", None)
            .await?;

        if !rows.is_empty() {
            tracing::debug!(count = rows.len(), "downloads-scoped query");
            return Ok(rows.iter().map(|e| e.to_file_info()).collect());
        }

        tracing::debug!("downloads-scoped query returned no rows, trying broader search");
        self.search_all().await
    }

    /// Broader search: any collection, `.csv` suffix, downloads-like path.
    pub async fn search_all(&self) -> StorageResult<Vec<CsvFileInfo>> {
        let rows = self.index.query(None, ".csv", Some("Download")).await?;
        tracing::debug!(count = rows.len(), "broad catalog search");
        Ok(rows.iter().map(|e| e.to_file_info()).collect())
    }

    /// Delete a selection of exports, one at a time.
    ///
    /// Each deletion is attempted independently; a failed item is recorded
    /// and logged but does not abort the rest. No rollback. A row whose
    /// backing file is already gone counts as a failure, but its index row
    /// is removed so it does not haunt later listings.
    pub async fn delete(&self, handles: &[String]) -> DeleteReport {
        let mut report = DeleteReport::default();

        for handle in handles {
            match self.delete_one(handle).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    tracing::warn!(handle = %handle, error = %e, "failed to delete export");
                    report.failures.push(DeleteFailure {
                        handle: handle.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            deleted = report.deleted,
            failed = report.failures.len(),
            "batch delete finished"
        );
        report
    }

    async fn delete_one(&self, handle: &str) -> StorageResult<()> {
        let id = parse_handle(handle)
            .ok_or_else(|| StorageError::InvalidHandle(handle.to_string()))?;

        let entry = self
            .index
            .find(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(handle.to_string()))?;

        let path = self.index.root().join(&entry.relative_path);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            // The row has nothing backing it; drop it so it cannot
            // linger in listings, but report the item as failed.
            self.index.remove(id).await?;
            return Err(StorageError::NotFound(format!(
                "Backing file missing for {}",
                handle
            )));
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete {}: {}", path.display(), e))
        })?;
        self.index.remove(id).await?;

        Ok(())
    }
}
