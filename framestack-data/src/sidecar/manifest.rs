//! Per-split history manifest: the whole split's sidecars as one JSON-lines
//! file, so lookups need no path substitution.

use crate::error::DataError;
use crate::sidecar::write_atomic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One manifest line: a frame and its history window, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub frame: PathBuf,
    pub history: Vec<PathBuf>,
}

/// In-memory map from frame path to its history window.
#[derive(Debug, Clone, Default)]
pub struct HistoryManifest {
    entries: HashMap<PathBuf, Vec<PathBuf>>,
}

impl HistoryManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a single manifest file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let mut manifest = Self::new();
        manifest.extend_from_file(path)?;
        Ok(manifest)
    }

    /// Merge the records of another manifest file. Later records win.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn extend_from_file(&mut self, path: &Path) -> Result<(), DataError> {
        let text = fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        let before = self.entries.len();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: ManifestRecord =
                serde_json::from_str(line).map_err(|source| DataError::Manifest {
                    path: path.to_path_buf(),
                    line: i + 1,
                    source,
                })?;
            self.insert(record);
        }
        debug!("Loaded {} manifest records", self.entries.len() - before);
        Ok(())
    }

    pub fn insert(&mut self, record: ManifestRecord) {
        self.entries.insert(record.frame, record.history);
    }

    pub fn get(&self, frame: &Path) -> Option<&[PathBuf]> {
        self.entries.get(frame).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write `records` as JSON lines, sorted by frame path so that rebuilding
    /// an unchanged split gives an identical file.
    pub fn write(path: &Path, records: &[ManifestRecord]) -> Result<(), DataError> {
        let mut sorted: Vec<&ManifestRecord> = records.iter().collect();
        sorted.sort_by(|a, b| a.frame.cmp(&b.frame));

        let mut out = String::new();
        for (i, record) in sorted.iter().enumerate() {
            let line = serde_json::to_string(record).map_err(|source| DataError::Manifest {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })?;
            out.push_str(&line);
            out.push('\n');
        }
        write_atomic(path, out.as_bytes())
    }
}
