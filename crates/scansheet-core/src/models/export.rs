use chrono::{DateTime, Utc};

/// Descriptor of one exported CSV file, as discovered through the file
/// index or returned from a persist operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CsvFileInfo {
    /// Stable handle for delete/share operations. Index-backed entries use
    /// `scansheet://{collection}/{id}`; legacy direct writes use a
    /// `file://` path.
    pub handle: String,
    /// Display name, e.g. `scansheet_data_20260829_101500.csv`.
    pub name: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}
