//! Offline history index builder.
//!
//! Walks `<root>/<split>/images`, and for every sequential frame whose full
//! window of predecessors exists on disk, writes a sidecar under
//! `<root>/<split>/<history_dir_name>` at the mirrored relative path. Stale
//! sidecars from earlier runs are left in place; rerun after deleting frames
//! to regenerate the index.

use crate::config::{IMAGES_DIR, IndexConfig};
use crate::error::DataError;
use crate::naming::{FrameName, has_image_extension};
use crate::sidecar::{HistoryManifest, ManifestRecord, with_sidecar_suffix, write_sidecar};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of building one split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub split: String,
    /// Regular files seen under the images directory.
    pub scanned: usize,
    /// Sidecars written.
    pub written: usize,
    pub skipped_extension: usize,
    /// Image files whose stem is not `<prefix>_<6 digits>`.
    pub skipped_pattern: usize,
    /// Frames with at least one predecessor missing.
    pub incomplete_history: usize,
    /// Directory entries that could not be read during the walk.
    pub walk_errors: usize,
}

impl SplitReport {
    fn new(split: &str) -> Self {
        Self {
            split: split.to_string(),
            ..Self::default()
        }
    }
}

/// Outcome of a whole build, one report per configured split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub splits: Vec<SplitReport>,
}

impl IndexReport {
    pub fn split(&self, name: &str) -> Option<&SplitReport> {
        self.splits.iter().find(|s| s.split == name)
    }

    pub fn total_written(&self) -> usize {
        self.splits.iter().map(|s| s.written).sum()
    }

    /// Whether any directory entry could not be visited.
    pub fn has_walk_errors(&self) -> bool {
        self.splits.iter().any(|s| s.walk_errors > 0)
    }
}

/// Builds history sidecars for every configured split.
#[derive(Debug, Clone)]
pub struct HistoryIndexBuilder {
    config: IndexConfig,
}

impl HistoryIndexBuilder {
    pub fn new(config: IndexConfig) -> Result<Self, DataError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Build every split, sequentially or one thread per split.
    pub fn build(&self) -> Result<IndexReport, DataError> {
        let splits = if self.config.parallel_splits {
            std::thread::scope(|scope| {
                let handles: Vec<_> = self
                    .config
                    .splits
                    .iter()
                    .map(|split| scope.spawn(move || self.build_split(split)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })?
        } else {
            self.config
                .splits
                .iter()
                .map(|split| self.build_split(split))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(IndexReport { splits })
    }

    /// Build a single split. A split without an images directory yields an
    /// empty report.
    #[tracing::instrument(skip(self), fields(root = %self.config.root.display()))]
    pub fn build_split(&self, split: &str) -> Result<SplitReport, DataError> {
        let split_dir = self.config.root.join(split);
        let images_dir = split_dir.join(IMAGES_DIR);
        let history_dir = split_dir.join(&self.config.history.history_dir_name);
        let mut report = SplitReport::new(split);

        if !images_dir.is_dir() {
            warn!("No images directory at {}", images_dir.display());
            return Ok(report);
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&images_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    report.walk_errors += 1;
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            report.scanned += 1;

            if !has_image_extension(path, &self.config.extensions) {
                report.skipped_extension += 1;
                continue;
            }
            let Some(name) = FrameName::parse(path) else {
                report.skipped_pattern += 1;
                continue;
            };
            let Some(window) = self.complete_window(path, &name) else {
                report.incomplete_history += 1;
                continue;
            };

            let frames = window
                .iter()
                .map(|p| fs::canonicalize(p).map_err(|e| DataError::io(p, e)))
                .collect::<Result<Vec<_>, _>>()?;
            let Ok(relative) = path.strip_prefix(&images_dir) else {
                continue;
            };
            let sidecar = with_sidecar_suffix(
                &history_dir.join(relative),
                &self.config.history.sidecar_suffix,
            );
            write_sidecar(&sidecar, &frames)?;
            debug!("Wrote {}", sidecar.display());
            report.written += 1;

            if self.config.write_manifest {
                if let Some(frame) = frames.last().cloned() {
                    records.push(ManifestRecord {
                        frame,
                        history: frames,
                    });
                }
            }
        }

        if self.config.write_manifest {
            let manifest_path = history_dir.join(&self.config.manifest_name);
            HistoryManifest::write(&manifest_path, &records)?;
        }

        info!(
            scanned = report.scanned,
            written = report.written,
            skipped_extension = report.skipped_extension,
            skipped_pattern = report.skipped_pattern,
            incomplete_history = report.incomplete_history,
            walk_errors = report.walk_errors,
            "Built history maps for split '{}'",
            split
        );
        Ok(report)
    }

    /// Candidate paths for the window ending at `frame`, when all of them
    /// exist. Candidates live in the same directory as the frame.
    fn complete_window(&self, frame: &Path, name: &FrameName) -> Option<Vec<PathBuf>> {
        let depth = u32::try_from(self.config.history.history_depth).ok()?;
        let dir = frame.parent()?;
        let window: Vec<PathBuf> = name
            .window(depth)?
            .iter()
            .map(|n| dir.join(n.file_name()))
            .collect();
        window.iter().all(|p| p.exists()).then_some(window)
    }
}
