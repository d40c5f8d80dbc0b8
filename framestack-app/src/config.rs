//! Optional JSON configuration file, merged with command line flags.

use crate::cli::{BuildIndexArgs, InspectArgs};
use crate::error::AppError;
use framestack_data::config::{DEFAULT_EXTENSIONS, DEFAULT_SPLITS};
use framestack_data::{HistoryConfig, IndexConfig};
use framestack_train::loader::DEFAULT_IMAGE_SIZE;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub history: HistoryConfig,
    pub splits: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub write_manifest: bool,
    pub parallel_splits: bool,
    pub image_size: Option<u32>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Read `path`, or return defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn log_level(&self, flag: Option<&str>) -> String {
        flag.or(self.log_level.as_deref())
            .unwrap_or("info")
            .to_string()
    }

    fn history(&self, depth: Option<usize>, history_dir: Option<&str>) -> HistoryConfig {
        let mut history = self.history.clone();
        if let Some(depth) = depth {
            history.history_depth = depth;
        }
        if let Some(name) = history_dir {
            history.history_dir_name = name.to_string();
        }
        history
    }

    pub fn extensions(&self) -> Vec<String> {
        self.extensions.clone().unwrap_or_else(|| {
            DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
        })
    }

    pub fn index_config(&self, args: &BuildIndexArgs) -> IndexConfig {
        let splits = if !args.splits.is_empty() {
            args.splits.clone()
        } else {
            self.splits.clone().unwrap_or_else(|| {
                DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect()
            })
        };
        let mut config = IndexConfig::new(&args.root)
            .with_splits(splits)
            .with_history(self.history(args.depth, args.history_dir.as_deref()))
            .with_manifest(args.manifest || self.write_manifest)
            .with_parallel_splits(args.parallel || self.parallel_splits);
        config.extensions = self.extensions();
        config
    }

    pub fn inspect_history(&self, args: &InspectArgs) -> HistoryConfig {
        self.history(args.depth, args.history_dir.as_deref())
    }

    pub fn image_size(&self, flag: Option<u32>) -> u32 {
        flag.or(self.image_size).unwrap_or(DEFAULT_IMAGE_SIZE)
    }
}
