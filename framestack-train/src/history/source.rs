//! Where recorded frame histories come from.

use framestack_data::{DataError, HistoryConfig, HistoryManifest, read_sidecar, sidecar_path_for};
use std::path::{Path, PathBuf};
use tracing::trace;

/// A lookup from canonical frame path to its recorded history, oldest first.
///
/// `Ok(None)` means no history is recorded for the frame, which is the normal
/// case for frames without a full window and is not an error.
pub trait HistorySource {
    fn lookup(&self, canonical: &Path) -> Result<Option<Vec<PathBuf>>, DataError>;
}

impl<S: HistorySource + ?Sized> HistorySource for &S {
    fn lookup(&self, canonical: &Path) -> Result<Option<Vec<PathBuf>>, DataError> {
        (**self).lookup(canonical)
    }
}

/// Sidecar files found by mirroring the `images` directory into the history
/// subtree, or next to the image when the path has no `images` component.
#[derive(Debug, Clone)]
pub struct SidecarTree {
    config: HistoryConfig,
}

impl SidecarTree {
    pub fn new(config: HistoryConfig) -> Self {
        Self { config }
    }

    pub fn sidecar_path(&self, canonical: &Path) -> PathBuf {
        sidecar_path_for(canonical, &self.config)
    }
}

impl Default for SidecarTree {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistorySource for SidecarTree {
    fn lookup(&self, canonical: &Path) -> Result<Option<Vec<PathBuf>>, DataError> {
        let sidecar = self.sidecar_path(canonical);
        trace!("Looking up sidecar {}", sidecar.display());
        read_sidecar(&sidecar)
    }
}

/// Manifest entries are keyed by canonicalized paths; a path that is not
/// found as given is retried in canonical form.
impl HistorySource for HistoryManifest {
    fn lookup(&self, canonical: &Path) -> Result<Option<Vec<PathBuf>>, DataError> {
        if let Some(history) = self.get(canonical) {
            return Ok(Some(history.to_vec()));
        }
        let Ok(resolved) = std::fs::canonicalize(canonical) else {
            return Ok(None);
        };
        Ok(self.get(&resolved).map(<[PathBuf]>::to_vec))
    }
}
