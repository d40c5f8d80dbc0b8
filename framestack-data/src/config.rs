//! Configuration for history lookup and index building.

use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory component that holds original frames inside a split.
pub const IMAGES_DIR: &str = "images";

/// Image extensions accepted when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Splits built when none are configured.
pub const DEFAULT_SPLITS: [&str; 3] = ["train", "val", "test"];

/// Parameters shared by the index builder and the frame resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of preceding frames in a full window.
    pub history_depth: usize,
    /// Name of the sidecar subtree that mirrors `images`.
    pub history_dir_name: String,
    /// File suffix that replaces the image extension on sidecars.
    pub sidecar_suffix: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            history_depth: 5,
            history_dir_name: "history_maps".to_string(),
            sidecar_suffix: ".frames.txt".to_string(),
        }
    }
}

impl HistoryConfig {
    /// Set the history depth.
    pub fn with_depth(mut self, history_depth: usize) -> Self {
        self.history_depth = history_depth;
        self
    }

    /// Set the sidecar subtree name.
    pub fn with_history_dir(mut self, name: impl Into<String>) -> Self {
        self.history_dir_name = name.into();
        self
    }

    /// Set the sidecar suffix.
    pub fn with_sidecar_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.sidecar_suffix = suffix.into();
        self
    }

    /// Maximum number of frames in a resolved list (history plus current).
    pub fn window_len(&self) -> usize {
        self.history_depth + 1
    }

    /// Sidecar suffix without its leading dot, as used by `Path::with_extension`.
    pub fn sidecar_extension(&self) -> &str {
        self.sidecar_suffix.trim_start_matches('.')
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.history_dir_name.is_empty()
            || self.history_dir_name.contains(['/', '\\'])
            || self.history_dir_name == IMAGES_DIR
        {
            return Err(DataError::InvalidConfig(format!(
                "history_dir_name must be a single directory name other than '{}', got '{}'",
                IMAGES_DIR, self.history_dir_name
            )));
        }
        if self.sidecar_extension().is_empty() {
            return Err(DataError::InvalidConfig(format!(
                "sidecar_suffix must not be empty, got '{}'",
                self.sidecar_suffix
            )));
        }
        if u32::try_from(self.history_depth).is_err() {
            return Err(DataError::InvalidConfig(format!(
                "history_depth {} is too large",
                self.history_depth
            )));
        }
        Ok(())
    }
}

/// Parameters for one offline index build over a dataset root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory containing one subdirectory per split.
    pub root: PathBuf,
    pub splits: Vec<String>,
    /// Accepted image extensions, compared case-insensitively.
    pub extensions: Vec<String>,
    pub history: HistoryConfig,
    /// File name of the per-split manifest inside the sidecar subtree.
    pub manifest_name: String,
    pub write_manifest: bool,
    /// Build each split on its own thread.
    pub parallel_splits: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            splits: DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            history: HistoryConfig::default(),
            manifest_name: "history_index.jsonl".to_string(),
            write_manifest: false,
            parallel_splits: false,
        }
    }
}

impl IndexConfig {
    /// Create a configuration for the given dataset root with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_splits<I, S>(mut self, splits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.splits = splits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    pub fn with_manifest(mut self, write_manifest: bool) -> Self {
        self.write_manifest = write_manifest;
        self
    }

    pub fn with_parallel_splits(mut self, parallel_splits: bool) -> Self {
        self.parallel_splits = parallel_splits;
        self
    }

    pub fn validate(&self) -> Result<(), DataError> {
        self.history.validate()?;
        if self.splits.is_empty() {
            return Err(DataError::InvalidConfig("no splits configured".to_string()));
        }
        if let Some(split) = self
            .splits
            .iter()
            .find(|s| s.is_empty() || s.contains(['/', '\\']) || *s == "..")
        {
            return Err(DataError::InvalidConfig(format!(
                "split '{}' is not a directory name",
                split
            )));
        }
        if self.extensions.is_empty() {
            return Err(DataError::InvalidConfig(
                "no image extensions configured".to_string(),
            ));
        }
        if self.write_manifest && self.manifest_name.is_empty() {
            return Err(DataError::InvalidConfig(
                "manifest_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
