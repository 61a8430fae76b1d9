use crate::models::export::CsvFileInfo;

/// Terminal state of one upload submission.
///
/// Exactly one outcome is produced per submission; the value is returned
/// from the submit call rather than published through shared state.
/// `Pending` exists for callers that keep a current-state snapshot while a
/// request is in flight.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadOutcome {
    Pending,
    Succeeded(CsvFileInfo),
    Failed(String),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Succeeded(_))
    }

    /// Failure message, if this outcome is a failure.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            UploadOutcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
