//! Managed file index
//!
//! The platform's indexed-file store, rendered as a JSON manifest at the
//! export root. Rows carry {id, display name, size, creation time,
//! relative path, collection}; queries filter by collection and name
//! suffix and return rows newest-first. `rescan` walks a directory and
//! registers files the index does not know yet, which is how the legacy
//! backend's direct writes become discoverable.

use crate::traits::{StorageError, StorageResult};
use chrono::{DateTime, TimeZone, Utc};
use scansheet_core::CsvFileInfo;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Manifest filename, kept out of query results.
const INDEX_FILE: &str = ".scansheet-index.json";

/// Handle scheme for index-backed entries.
const HANDLE_SCHEME: &str = "scansheet";

/// Index collection a row belongs to.
///
/// `Downloads` is the managed downloads collection the scoped backend
/// registers into; `Files` is the generic-files collection that rescans
/// populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Downloads,
    Files,
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Collection::Downloads => write!(f, "downloads"),
            Collection::Files => write!(f, "files"),
        }
    }
}

/// One row of the file index.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct IndexEntry {
    pub id: Uuid,
    pub display_name: String,
    pub size_bytes: u64,
    /// Creation time, epoch seconds.
    pub created_at: i64,
    /// Path relative to the export root, e.g. `Download/ScanSheet/x.csv`.
    pub relative_path: String,
    pub mime_type: String,
    pub collection: Collection,
}

impl IndexEntry {
    /// Content handle: the row id appended to its collection base.
    pub fn handle(&self) -> String {
        format!("{}://{}/{}", HANDLE_SCHEME, self.collection, self.id)
    }

    pub fn created_at_utc(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.created_at, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    pub fn to_file_info(&self) -> CsvFileInfo {
        CsvFileInfo {
            handle: self.handle(),
            name: self.display_name.clone(),
            size_bytes: self.size_bytes,
            created_at: self.created_at_utc(),
        }
    }
}

/// Parse a `scansheet://{collection}/{id}` handle back into its row id.
pub fn parse_handle(handle: &str) -> Option<Uuid> {
    let rest = handle.strip_prefix(HANDLE_SCHEME)?.strip_prefix("://")?;
    let (_collection, id) = rest.split_once('/')?;
    Uuid::parse_str(id).ok()
}

/// JSON-manifest file index rooted at the export directory.
#[derive(Clone)]
pub struct FileIndex {
    root: PathBuf,
}

impl FileIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileIndex { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Capability probe: whether the managed index is usable at this root.
    pub async fn probe(&self) -> bool {
        if fs::create_dir_all(&self.root).await.is_err() {
            return false;
        }
        match self.load().await {
            Ok(entries) => self.save(&entries).await.is_ok(),
            Err(_) => false,
        }
    }

    async fn load(&self) -> StorageResult<Vec<IndexEntry>> {
        let path = self.manifest_path();
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path).await?;
        serde_json::from_str(&raw)
            .map_err(|e| StorageError::IndexError(format!("Corrupt index manifest: {}", e)))
    }

    async fn save(&self, entries: &[IndexEntry]) -> StorageResult<()> {
        fs::create_dir_all(&self.root).await?;
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::IndexError(format!("Failed to serialize index: {}", e)))?;
        fs::write(self.manifest_path(), raw).await?;
        Ok(())
    }

    /// Register a new row.
    pub async fn insert(&self, entry: IndexEntry) -> StorageResult<()> {
        let mut entries = self.load().await?;
        entries.push(entry);
        self.save(&entries).await
    }

    /// Query rows by optional collection scope, display-name suffix, and
    /// optional path-containment filter. Rows come back newest-first.
    pub async fn query(
        &self,
        collection: Option<Collection>,
        name_suffix: &str,
        path_contains: Option<&str>,
    ) -> StorageResult<Vec<IndexEntry>> {
        let mut rows: Vec<IndexEntry> = self
            .load()
            .await?
            .into_iter()
            .filter(|e| collection.map_or(true, |c| e.collection == c))
            .filter(|e| e.display_name.ends_with(name_suffix))
            .filter(|e| path_contains.map_or(true, |seg| e.relative_path.contains(seg)))
            .collect();

        rows.sort_by_key(|e| std::cmp::Reverse(e.created_at));
        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> StorageResult<Option<IndexEntry>> {
        Ok(self.load().await?.into_iter().find(|e| e.id == id))
    }

    /// Remove a row. Returns whether a row was removed.
    pub async fn remove(&self, id: Uuid) -> StorageResult<bool> {
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            self.save(&entries).await?;
        }
        Ok(removed)
    }

    /// Walk `root/subdir` and register files the index does not know yet.
    ///
    /// Newly found rows land in the given collection with their filesystem
    /// metadata. Returns the number of rows added.
    pub async fn rescan(&self, subdir: &str, collection: Collection) -> StorageResult<usize> {
        let dir = self.root.join(subdir);
        if !fs::try_exists(&dir).await.unwrap_or(false) {
            return Ok(0);
        }

        let mut entries = self.load().await?;
        let mut added = 0;

        let mut reader = fs::read_dir(&dir).await?;
        while let Some(dirent) = reader.next_entry().await? {
            let meta = dirent.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let name = dirent.file_name().to_string_lossy().to_string();
            if name == INDEX_FILE {
                continue;
            }
            let relative_path = format!("{}/{}", subdir.trim_end_matches('/'), name);
            if entries.iter().any(|e| e.relative_path == relative_path) {
                continue;
            }

            let created_at = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or_else(|| Utc::now().timestamp());

            entries.push(IndexEntry {
                id: Uuid::new_v4(),
                display_name: name,
                size_bytes: meta.len(),
                created_at,
                relative_path,
                mime_type: "application/octet-stream".to_string(),
                collection,
            });
            added += 1;
        }

        if added > 0 {
            self.save(&entries).await?;
        }

        tracing::debug!(subdir, added, "index rescan finished");
        Ok(added)
    }
}
