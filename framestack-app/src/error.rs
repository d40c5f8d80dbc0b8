//! Error types for command execution.

use framestack_data::DataError;
use framestack_train::DatasetError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
