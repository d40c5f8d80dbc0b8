//! Errors raised while building or sampling a temporal dataset.

use framestack_data::DataError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Frames not found for index {index}")]
    FramesNotFound { index: usize },

    #[error("Sample index {index} out of range (dataset has {len} samples)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Image decoding error for {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid image size {0}: must be at least 1 pixel")]
    InvalidImageSize(u32),

    #[error("No images found under {}", .dir.display())]
    NoImages { dir: PathBuf },

    #[error("History error: {0}")]
    History(#[from] DataError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
