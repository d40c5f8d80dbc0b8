//! Frame sizes, decoding and the single-frame loader trait.

use crate::error::DatasetError;
use image::imageops::{self, FilterType};
use image::{ImageError, ImageReader, RgbImage};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Image size in pixels, height first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrameSize {
    pub height: u32,
    pub width: u32,
}

impl FrameSize {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Size of an image buffer.
    pub fn of(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self { height, width }
    }

    /// `(height, width)`.
    pub fn as_hw(&self) -> (u32, u32) {
        (self.height, self.width)
    }
}

/// A decoded canonical frame together with its sizing.
#[derive(Debug, Clone)]
pub struct LoadedFrame {
    /// Image after resizing to `resized`.
    pub image: RgbImage,
    /// Size as stored on disk.
    pub original: FrameSize,
    /// Size after applying the loader's sizing policy.
    pub resized: FrameSize,
}

/// Trait for datasets of single images that can load one sample by index.
///
/// Implementations must not mutate shared state in `load_image`, so one
/// loader can serve concurrent fetches.
pub trait FrameLoader {
    /// Canonical image path of every sample, in sample order.
    fn image_paths(&self) -> &[PathBuf];

    /// Load and size the canonical frame of sample `index`.
    ///
    /// `rect_mode` keeps the aspect ratio; otherwise the frame is stretched to
    /// a square.
    fn load_image(&self, index: usize, rect_mode: bool) -> Result<LoadedFrame, DatasetError>;

    fn len(&self) -> usize {
        self.image_paths().len()
    }

    fn is_empty(&self) -> bool {
        self.image_paths().is_empty()
    }
}

/// Decode an image file to 8-bit RGB.
///
/// The format is detected from the file contents, falling back to the
/// extension, so a PNG stored under `.jpg` still decodes.
pub fn open_rgb(path: &Path) -> Result<RgbImage, ImageError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.decode()?.into_rgb8())
}

/// [`open_rgb`] with the path attached to the error.
pub fn decode_rgb(path: &Path) -> Result<RgbImage, DatasetError> {
    open_rgb(path).map_err(|source| DatasetError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Bilinear resize to `size`. Images already at `size` are returned as is.
pub fn resize_to(image: RgbImage, size: FrameSize) -> RgbImage {
    if FrameSize::of(&image) == size {
        return image;
    }
    imageops::resize(&image, size.width, size.height, FilterType::Triangle)
}
