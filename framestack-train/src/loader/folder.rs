//! Single-frame loader over a list of image files.

use crate::error::DatasetError;
use crate::loader::frame::{FrameLoader, FrameSize, LoadedFrame, decode_rgb, resize_to};
use framestack_data::has_image_extension;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Default long-side size in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 640;

/// Target size for a frame of `original` size.
///
/// In rect mode the long side is scaled to `image_size` and the other side
/// follows the aspect ratio, rounded up and capped at `image_size`. Otherwise
/// the frame is stretched to `image_size` square.
pub fn target_size(original: FrameSize, image_size: u32, rect_mode: bool) -> FrameSize {
    if !rect_mode {
        return FrameSize::new(image_size, image_size);
    }
    let long_side = original.height.max(original.width).max(1);
    let ratio = f64::from(image_size) / f64::from(long_side);
    if ratio == 1.0 {
        return original;
    }
    let scale = |side: u32| ((f64::from(side) * ratio).ceil() as u32).clamp(1, image_size.max(1));
    FrameSize::new(scale(original.height), scale(original.width))
}

/// Loads samples from image files, sizing them for a square network input.
#[derive(Debug, Clone)]
pub struct ImageFolderLoader {
    image_paths: Vec<PathBuf>,
    image_size: u32,
}

impl ImageFolderLoader {
    /// Fails with [`DatasetError::InvalidImageSize`] when `image_size` is 0.
    pub fn new(image_paths: Vec<PathBuf>, image_size: u32) -> Result<Self, DatasetError> {
        if image_size == 0 {
            return Err(DatasetError::InvalidImageSize(image_size));
        }
        Ok(Self {
            image_paths,
            image_size,
        })
    }

    /// Collect every image under `dir` with an accepted extension, sorted by
    /// path so sample order is stable between runs.
    #[tracing::instrument(skip_all, fields(dir = %dir.display(), image_size = image_size))]
    pub fn from_dir(
        dir: &Path,
        extensions: &[String],
        image_size: u32,
    ) -> Result<Self, DatasetError> {
        if image_size == 0 {
            return Err(DatasetError::InvalidImageSize(image_size));
        }
        let mut image_paths = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && has_image_extension(path, extensions) {
                image_paths.push(path.to_path_buf());
            }
        }
        if image_paths.is_empty() {
            return Err(DatasetError::NoImages {
                dir: dir.to_path_buf(),
            });
        }
        image_paths.sort();
        info!("Found {} images", image_paths.len());
        Self::new(image_paths, image_size)
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }
}

impl FrameLoader for ImageFolderLoader {
    fn image_paths(&self) -> &[PathBuf] {
        &self.image_paths
    }

    fn load_image(&self, index: usize, rect_mode: bool) -> Result<LoadedFrame, DatasetError> {
        let path = self
            .image_paths
            .get(index)
            .ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.image_paths.len(),
            })?;
        let image = decode_rgb(path)?;
        let original = FrameSize::of(&image);
        let resized = target_size(original, self.image_size, rect_mode);
        debug!(
            "Loaded {} at {}x{}, target {}x{}",
            path.display(),
            original.width,
            original.height,
            resized.width,
            resized.height
        );
        Ok(LoadedFrame {
            image: resize_to(image, resized),
            original,
            resized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_target_size_rect_landscape() {
        let size = target_size(FrameSize::new(480, 1280), 640, true);
        assert_eq!(size, FrameSize::new(240, 640));
    }

    #[test]
    fn test_target_size_rect_rounds_up() {
        // 333 * (640 / 1000) = 213.12
        let size = target_size(FrameSize::new(333, 1000), 640, true);
        assert_eq!(size, FrameSize::new(214, 640));
    }

    #[test]
    fn test_target_size_rect_upscales_small_frames() {
        let size = target_size(FrameSize::new(32, 16), 64, true);
        assert_eq!(size, FrameSize::new(64, 32));
    }

    #[test]
    fn test_target_size_rect_unchanged_at_size() {
        let size = target_size(FrameSize::new(640, 300), 640, true);
        assert_eq!(size, FrameSize::new(640, 300));
    }

    #[test]
    fn test_target_size_stretch() {
        assert_eq!(
            target_size(FrameSize::new(480, 1280), 320, false),
            FrameSize::new(320, 320)
        );
    }

    #[test]
    fn test_load_image_reports_sizes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scene_000001.png");
        RgbImage::from_pixel(80, 40, Rgb([1, 2, 3])).save(&path).unwrap();

        let loader = ImageFolderLoader::new(vec![path], 32).unwrap();
        let rect = loader.load_image(0, true).unwrap();
        assert_eq!(rect.original, FrameSize::new(40, 80));
        assert_eq!(rect.resized, FrameSize::new(16, 32));
        assert_eq!(rect.image.dimensions(), (32, 16));

        let square = loader.load_image(0, false).unwrap();
        assert_eq!(square.resized, FrameSize::new(32, 32));
        assert_eq!(square.image.dimensions(), (32, 32));
    }

    #[test]
    fn test_load_image_out_of_range() {
        let loader = ImageFolderLoader::new(Vec::new(), 32).unwrap();
        assert!(matches!(
            loader.load_image(3, true),
            Err(DatasetError::IndexOutOfRange { index: 3, len: 0 })
        ));
    }

    #[test]
    fn test_from_dir_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("b");
        std::fs::create_dir_all(&nested).unwrap();
        for path in [
            nested.join("s_000001.png"),
            dir.path().join("a_000002.PNG"),
            dir.path().join("a_000001.png"),
        ] {
            RgbImage::new(2, 2).save_with_format(&path, image::ImageFormat::Png).unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let exts = vec!["png".to_string()];
        let loader = ImageFolderLoader::from_dir(dir.path(), &exts, 16).unwrap();
        let names: Vec<_> = loader
            .image_paths()
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a_000001.png"),
                PathBuf::from("a_000002.PNG"),
                PathBuf::from("b/s_000001.png"),
            ]
        );
    }

    #[test]
    fn test_zero_image_size_rejected() {
        assert!(matches!(
            ImageFolderLoader::new(vec![PathBuf::from("a_000001.png")], 0),
            Err(DatasetError::InvalidImageSize(0))
        ));

        let dir = TempDir::new().unwrap();
        RgbImage::new(2, 2).save(dir.path().join("a_000001.png")).unwrap();
        let exts = vec!["png".to_string()];
        assert!(matches!(
            ImageFolderLoader::from_dir(dir.path(), &exts, 0),
            Err(DatasetError::InvalidImageSize(0))
        ));
    }

    #[test]
    fn test_from_dir_without_images() {
        let dir = TempDir::new().unwrap();
        let exts = vec!["jpg".to_string()];
        assert!(matches!(
            ImageFolderLoader::from_dir(dir.path(), &exts, 16),
            Err(DatasetError::NoImages { .. })
        ));
    }
}
