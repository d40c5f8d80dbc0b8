//! Resolve canonical frames into bounded, ordered frame lists.

use crate::history::source::{HistorySource, SidecarTree};
use framestack_data::{DataError, HistoryConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Ordered frames for one sample, oldest first, canonical frame last.
///
/// Always holds at least one path and at most `history_depth + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFrameList {
    paths: Vec<PathBuf>,
}

impl ResolvedFrameList {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The newest frame in the list.
    pub fn current(&self) -> Option<&Path> {
        self.paths.last().map(PathBuf::as_path)
    }

    /// Number of frames preceding the current one.
    pub fn history_len(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }
}

impl<'a> IntoIterator for &'a ResolvedFrameList {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Keep the newest `history_depth + 1` entries, dropping the oldest first.
pub fn trim_to_window(mut paths: Vec<PathBuf>, history_depth: usize) -> Vec<PathBuf> {
    let keep = history_depth.saturating_add(1);
    if paths.len() > keep {
        paths.drain(..paths.len() - keep);
    }
    paths
}

/// Resolves canonical frame paths through a [`HistorySource`].
#[derive(Debug, Clone)]
pub struct FrameResolver<S = SidecarTree> {
    source: S,
    history_depth: usize,
}

impl FrameResolver<SidecarTree> {
    /// Resolver over the sidecar tree described by `config`.
    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(SidecarTree::new(config.clone()), config.history_depth)
    }
}

impl<S: HistorySource> FrameResolver<S> {
    pub fn new(source: S, history_depth: usize) -> Self {
        Self {
            source,
            history_depth,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn history_depth(&self) -> usize {
        self.history_depth
    }

    /// Resolve one canonical frame.
    ///
    /// Frames without recorded history resolve to themselves alone. Listed
    /// paths are not checked for existence here.
    pub fn resolve(&self, canonical: &Path) -> Result<ResolvedFrameList, DataError> {
        let candidates = match self.source.lookup(canonical)? {
            Some(history) if !history.is_empty() => history,
            Some(_) => {
                warn!(
                    "Empty history for {}, using the frame alone",
                    canonical.display()
                );
                vec![canonical.to_path_buf()]
            }
            None => vec![canonical.to_path_buf()],
        };
        Ok(ResolvedFrameList {
            paths: trim_to_window(candidates, self.history_depth),
        })
    }

    /// Resolve every sample path, preserving order.
    #[tracing::instrument(skip_all, fields(history_depth = self.history_depth))]
    pub fn resolve_all<P: AsRef<Path>>(
        &self,
        canonical: &[P],
    ) -> Result<Vec<ResolvedFrameList>, DataError> {
        let lists = canonical
            .iter()
            .map(|p| self.resolve(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let with_history = lists.iter().filter(|l| l.history_len() > 0).count();
        debug!(
            "Resolved {} samples, {} with history",
            lists.len(),
            with_history
        );
        Ok(lists)
    }
}
