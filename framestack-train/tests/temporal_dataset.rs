use framestack_data::{HistoryConfig, HistoryIndexBuilder, HistoryManifest, IndexConfig};
use framestack_train::{
    DatasetError, FrameLoader, FrameSize, ImageFolderLoader, LoadedFrame, TemporalDataset,
};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_frame(path: &Path, width: u32, height: u32, value: u8) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_pixel(width, height, Rgb([value, value / 2, 255 - value]))
        .save(path)
        .unwrap();
}

/// Writes `<root>/train/images/<scene>_<i>.png` for every index in `range`.
fn write_scene(
    root: &Path,
    scene: &str,
    range: std::ops::RangeInclusive<u32>,
    width: u32,
    height: u32,
) -> Vec<PathBuf> {
    range
        .map(|i| {
            let path = root
                .join("train/images")
                .join(format!("{}_{:06}.png", scene, i));
            write_frame(&path, width, height, (i * 20) as u8);
            path
        })
        .collect()
}

fn build_index(root: &Path, depth: usize, manifest: bool) {
    let config = IndexConfig::new(root)
        .with_splits(["train"])
        .with_history(HistoryConfig::default().with_depth(depth))
        .with_manifest(manifest);
    HistoryIndexBuilder::new(config).unwrap().build().unwrap();
}

fn images_loader(root: &Path, image_size: u32) -> ImageFolderLoader {
    let exts = vec!["png".to_string(), "jpg".to_string()];
    ImageFolderLoader::from_dir(&root.join("train/images"), &exts, image_size).unwrap()
}

fn sample_index(dataset: &TemporalDataset<ImageFolderLoader>, name: &str) -> usize {
    dataset
        .base()
        .image_paths()
        .iter()
        .position(|p| p.file_name().unwrap() == name)
        .unwrap()
}

#[test]
fn test_full_window_stack() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene", 1..=10, 64, 32);
    build_index(dir.path(), 5, false);

    let dataset =
        TemporalDataset::new(images_loader(dir.path(), 32), HistoryConfig::default()).unwrap();
    assert_eq!(dataset.len(), 10);

    let index = sample_index(&dataset, "scene_000010.png");
    let loaded = dataset.load_stack(index, true).unwrap();
    assert_eq!(loaded.depth(), 6);
    assert_eq!(loaded.stack.shape(), [6, 16, 32, 3]);
    assert_eq!(loaded.original, FrameSize::new(32, 64));
    assert_eq!(loaded.resized, FrameSize::new(16, 32));
    assert!(!loaded.is_degraded());

    // Oldest first: frame 5 has value 100, frame 10 has value 200.
    let first = loaded.stack.frame(0).unwrap();
    let last = loaded.stack.frame(5).unwrap();
    assert_eq!(first.get_pixel(0, 0)[0], 100);
    assert_eq!(last.get_pixel(0, 0)[0], 200);
}

#[test]
fn test_frames_without_history_fall_back() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene", 1..=10, 32, 32);
    build_index(dir.path(), 5, false);

    let dataset =
        TemporalDataset::new(images_loader(dir.path(), 32), HistoryConfig::default()).unwrap();
    let index = sample_index(&dataset, "scene_000003.png");

    let list = dataset.frame_list(index).unwrap();
    assert_eq!(list.paths(), &[dataset.base().image_paths()[index].clone()]);
    let loaded = dataset.load_stack(index, true).unwrap();
    assert_eq!(loaded.depth(), 1);
}

#[test]
fn test_missing_history_frames_are_dropped() {
    let dir = TempDir::new().unwrap();
    let frames = write_scene(dir.path(), "scene", 1..=6, 48, 24);
    build_index(dir.path(), 5, false);
    fs::remove_file(&frames[1]).unwrap();
    fs::remove_file(&frames[3]).unwrap();

    let loader = ImageFolderLoader::new(vec![frames[5].clone()], 24).unwrap();
    let dataset = TemporalDataset::new(loader, HistoryConfig::default()).unwrap();
    assert_eq!(dataset.frame_list(0).unwrap().len(), 6);

    let loaded = dataset.load_stack(0, true).unwrap();
    assert_eq!(loaded.depth(), 4);
    assert!(loaded.is_degraded());
    assert_eq!(loaded.dropped.len(), 2);
    assert!(loaded.dropped[0].path.ends_with("scene_000002.png"));
    assert!(loaded.dropped[1].path.ends_with("scene_000004.png"));
    for frame in loaded.stack.frames() {
        assert_eq!(frame.dimensions(), (24, 12));
    }
}

#[test]
fn test_corrupt_history_frame_is_dropped() {
    let dir = TempDir::new().unwrap();
    let frames = write_scene(dir.path(), "cam", 0..=2, 16, 16);
    build_index(dir.path(), 2, false);
    fs::write(&frames[0], b"not an image").unwrap();

    let loader = ImageFolderLoader::new(vec![frames[2].clone()], 16).unwrap();
    let dataset = TemporalDataset::new(loader, HistoryConfig::default().with_depth(2)).unwrap();
    let loaded = dataset.load_stack(0, true).unwrap();
    assert_eq!(loaded.depth(), 2);
    assert_eq!(loaded.dropped.len(), 1);
    assert!(!loaded.dropped[0].reason.is_empty());
}

#[test]
fn test_mislabeled_history_frame_is_kept() {
    let dir = TempDir::new().unwrap();
    let images = dir.path().join("train/images");
    fs::create_dir_all(&images).unwrap();
    let previous = images.join("run_000000.jpg");
    let current = images.join("run_000001.jpg");
    RgbImage::from_pixel(16, 16, Rgb([40, 40, 40]))
        .save_with_format(&previous, image::ImageFormat::Png)
        .unwrap();
    RgbImage::from_pixel(16, 16, Rgb([200, 200, 200]))
        .save(&current)
        .unwrap();
    build_index(dir.path(), 1, false);

    let loader = ImageFolderLoader::new(vec![current], 16).unwrap();
    let dataset = TemporalDataset::new(loader, HistoryConfig::default().with_depth(1)).unwrap();
    let loaded = dataset.load_stack(0, true).unwrap();
    assert_eq!(loaded.depth(), 2);
    assert!(loaded.dropped.is_empty());
    assert_eq!(loaded.stack.frame(0).unwrap().get_pixel(0, 0)[0], 40);
}

#[test]
fn test_zero_image_size_is_rejected() {
    let dir = TempDir::new().unwrap();
    let frames = write_scene(dir.path(), "scene", 0..=0, 8, 8);
    assert!(matches!(
        ImageFolderLoader::new(frames, 0),
        Err(DatasetError::InvalidImageSize(0))
    ));
}

#[test]
fn test_all_frames_unreadable_is_fatal() {
    let dir = TempDir::new().unwrap();
    let frames = write_scene(dir.path(), "scene", 1..=4, 16, 16);
    build_index(dir.path(), 3, false);
    for frame in &frames {
        fs::remove_file(frame).unwrap();
    }

    let loader = ImageFolderLoader::new(vec![frames[3].clone()], 16).unwrap();
    let dataset = TemporalDataset::new(loader, HistoryConfig::default().with_depth(3)).unwrap();
    let err = dataset.load_stack(0, true).unwrap_err();
    assert!(matches!(err, DatasetError::FramesNotFound { index: 0 }));
    assert_eq!(err.to_string(), "Frames not found for index 0");
}

#[test]
fn test_out_of_range_index() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene", 0..=0, 8, 8);
    let dataset =
        TemporalDataset::new(images_loader(dir.path(), 8), HistoryConfig::default()).unwrap();
    assert!(matches!(
        dataset.load_stack(1, true),
        Err(DatasetError::IndexOutOfRange { index: 1, len: 1 })
    ));
}

#[test]
fn test_configured_depth_trims_deeper_index() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene", 0..=8, 16, 16);
    build_index(dir.path(), 8, false);

    let config = HistoryConfig::default().with_depth(2);
    let dataset = TemporalDataset::new(images_loader(dir.path(), 16), config).unwrap();
    for list in dataset.frame_lists() {
        assert!(list.len() <= 3);
    }
    let index = sample_index(&dataset, "scene_000008.png");
    let list = dataset.frame_list(index).unwrap();
    assert_eq!(list.len(), 3);
    assert!(list.paths()[0].ends_with("scene_000006.png"));
    assert!(list.current().unwrap().ends_with("scene_000008.png"));
}

#[test]
fn test_history_resized_to_canonical_target() {
    let dir = TempDir::new().unwrap();
    let images = dir.path().join("train/images");
    write_frame(&images.join("mix_000000.png"), 100, 100, 10);
    write_frame(&images.join("mix_000001.png"), 20, 60, 20);
    write_frame(&images.join("mix_000002.png"), 80, 40, 30);
    build_index(dir.path(), 2, false);

    let dataset = TemporalDataset::new(
        images_loader(dir.path(), 40),
        HistoryConfig::default().with_depth(2),
    )
    .unwrap();
    let index = sample_index(&dataset, "mix_000002.png");
    let loaded = dataset.load_stack(index, true).unwrap();
    assert_eq!(loaded.resized, FrameSize::new(20, 40));
    assert_eq!(loaded.stack.shape(), [3, 20, 40, 3]);

    let square = dataset.load_stack(index, false).unwrap();
    assert_eq!(square.stack.shape(), [3, 40, 40, 3]);
}

#[test]
fn test_manifest_source_matches_sidecars() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene", 0..=5, 16, 16);
    build_index(dir.path(), 3, true);

    let config = HistoryConfig::default().with_depth(3);
    let by_sidecar = TemporalDataset::new(images_loader(dir.path(), 16), config.clone()).unwrap();
    let manifest =
        HistoryManifest::load(&dir.path().join("train/history_maps/history_index.jsonl")).unwrap();
    let by_manifest =
        TemporalDataset::with_source(images_loader(dir.path(), 16), config, &manifest).unwrap();

    assert_eq!(by_sidecar.frame_lists(), by_manifest.frame_lists());
}

#[test]
fn test_concurrent_fetches_are_consistent() {
    let dir = TempDir::new().unwrap();
    write_scene(dir.path(), "scene", 0..=7, 24, 24);
    build_index(dir.path(), 3, false);
    let dataset = TemporalDataset::new(
        images_loader(dir.path(), 24),
        HistoryConfig::default().with_depth(3),
    )
    .unwrap();

    let expected: Vec<_> = (0..dataset.len())
        .map(|i| dataset.load_stack(i, true).unwrap().stack)
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..dataset.len())
                        .map(|i| dataset.load_stack(i, true).unwrap().stack)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

/// A loader that reports a fixed target size, as a letterboxing loader would.
struct FixedSizeLoader {
    paths: Vec<PathBuf>,
    size: FrameSize,
}

impl FrameLoader for FixedSizeLoader {
    fn image_paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn load_image(&self, index: usize, _rect_mode: bool) -> Result<LoadedFrame, DatasetError> {
        let path = &self.paths[index];
        let image = framestack_train::loader::decode_rgb(path)?;
        let original = FrameSize::of(&image);
        Ok(LoadedFrame {
            image: framestack_train::loader::resize_to(image, self.size),
            original,
            resized: self.size,
        })
    }
}

#[test]
fn test_stack_follows_custom_loader_sizing() {
    let dir = TempDir::new().unwrap();
    let frames = write_scene(dir.path(), "scene", 0..=3, 30, 10);
    build_index(dir.path(), 3, false);

    let loader = FixedSizeLoader {
        paths: vec![frames[3].clone()],
        size: FrameSize::new(7, 5),
    };
    let dataset = TemporalDataset::new(loader, HistoryConfig::default().with_depth(3)).unwrap();
    let (stack, original, resized) = dataset.load_stack(0, true).unwrap().into_parts();
    assert_eq!(stack.shape(), [4, 7, 5, 3]);
    assert_eq!(original, (10, 30));
    assert_eq!(resized, (7, 5));
}

#[test]
fn test_colocated_sidecar_outside_images_tree() {
    let dir = TempDir::new().unwrap();
    let frames: Vec<PathBuf> = (0..3)
        .map(|i| {
            let path = dir.path().join(format!("clips/run_{:06}.png", i));
            write_frame(&path, 8, 8, i as u8);
            path
        })
        .collect();
    fs::write(
        dir.path().join("clips/run_000002.frames.txt"),
        frames
            .iter()
            .map(|p| p.to_str().unwrap())
            .collect::<Vec<_>>()
            .join("\n"),
    )
    .unwrap();

    let loader = ImageFolderLoader::new(vec![frames[2].clone()], 8).unwrap();
    let dataset = TemporalDataset::new(loader, HistoryConfig::default()).unwrap();
    assert_eq!(dataset.frame_list(0).unwrap().paths(), frames.as_slice());
    assert_eq!(dataset.load_stack(0, true).unwrap().depth(), 3);
}
