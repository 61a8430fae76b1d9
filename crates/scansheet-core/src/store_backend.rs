use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Export store backend tiers
///
/// `Scoped` registers entries in the managed file index before writing
/// (atomic-or-fail); `Legacy` writes directly and asks the index for a
/// best-effort rescan afterwards. Defined in core because configuration
/// and the storage factory both refer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Scoped,
    Legacy,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scoped" => Ok(StoreBackend::Scoped),
            "legacy" => Ok(StoreBackend::Legacy),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StoreBackend::Scoped => write!(f, "scoped"),
            StoreBackend::Legacy => write!(f, "legacy"),
        }
    }
}
