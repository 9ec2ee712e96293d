use std::path::PathBuf;
use thiserror::Error;

/// Failure of a session backend write (or of a read that must not be
/// fail-soft).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StorageError {
    #[error("session file I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode session data: {0}")]
    Encode(#[from] serde_json::Error),

    /// Failure reported by a custom backend
    #[error("session backend unavailable: {0}")]
    Backend(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
