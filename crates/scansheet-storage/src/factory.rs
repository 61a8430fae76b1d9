use crate::catalog::ExportCatalog;
use crate::index::FileIndex;
use crate::legacy::LegacyStore;
use crate::scoped::ScopedStore;
use crate::traits::{ExportStore, StorageResult};
use scansheet_core::{Config, StoreBackend};
use std::sync::Arc;

/// Create an export store based on configuration.
///
/// An explicit backend override wins; otherwise the managed index is
/// probed and the scoped backend is used when it is available, the legacy
/// backend when it is not.
pub async fn create_store(config: &Config) -> StorageResult<Arc<dyn ExportStore>> {
    let index = FileIndex::new(&config.export_root);

    let backend = match config.storage_backend {
        Some(backend) => backend,
        None => {
            if index.probe().await {
                StoreBackend::Scoped
            } else {
                StoreBackend::Legacy
            }
        }
    };

    tracing::info!(%backend, root = %config.export_root.display(), "selected export store backend");

    match backend {
        StoreBackend::Scoped => Ok(Arc::new(ScopedStore::new(index))),
        StoreBackend::Legacy => Ok(Arc::new(LegacyStore::new(index))),
    }
}

/// Create the export catalog over the same index the stores use.
pub fn create_catalog(config: &Config) -> ExportCatalog {
    ExportCatalog::new(FileIndex::new(&config.export_root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_config(root: std::path::PathBuf, backend: Option<StoreBackend>) -> Config {
        Config {
            api_url: "http://localhost:3000".to_string(),
            auth_token: "test-token".to_string(),
            encryption_key: String::new(),
            export_root: root,
            storage_backend: backend,
            call_timeout_secs: 120,
        }
    }

    #[tokio::test]
    async fn probe_selects_scoped_on_writable_root() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path().to_path_buf(), None);

        let store = create_store(&config).await.unwrap();
        assert_eq!(store.backend_type(), StoreBackend::Scoped);
    }

    #[tokio::test]
    async fn explicit_override_wins() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path().to_path_buf(), Some(StoreBackend::Legacy));

        let store = create_store(&config).await.unwrap();
        assert_eq!(store.backend_type(), StoreBackend::Legacy);
    }
}
