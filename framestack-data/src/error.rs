//! Error types for history index operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or reading history data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest record at {}:{line}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}
