use std::io;
use std::path::PathBuf;

/// Failures that abort a dataset load. Bad cell values never end up here;
/// they coerce to missing values inside the record.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dataset '{}' not found or unreadable: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error loading data: {reason}")]
    LoadFailure { reason: String },
}

impl LoadError {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::LoadFailure {
            reason: reason.into(),
        }
    }

    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}
