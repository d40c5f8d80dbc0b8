//! Temporal dataset built on a single-frame loader.

use crate::error::DatasetError;
use crate::history::{FrameResolver, HistorySource, ResolvedFrameList, SidecarTree};
use crate::loader::{FrameLoader, open_rgb, resize_to};
use crate::stack::frame_stack::{DroppedFrame, FrameStack, LoadedStack};
use framestack_data::HistoryConfig;
use tracing::{debug, info};

/// Dataset whose samples are stacks of a frame and its recorded history.
///
/// Frame lists are resolved once, at construction. Every
/// [`load_stack`](Self::load_stack) call reads and resizes from disk again;
/// nothing is cached, and no state is shared between calls, so one dataset
/// can serve several worker threads when `L` is `Sync`.
#[derive(Debug, Clone)]
pub struct TemporalDataset<L> {
    base: L,
    config: HistoryConfig,
    frame_lists: Vec<ResolvedFrameList>,
}

impl<L: FrameLoader> TemporalDataset<L> {
    /// Resolve histories from the sidecar tree described by `config`.
    pub fn new(base: L, config: HistoryConfig) -> Result<Self, DatasetError> {
        let source = SidecarTree::new(config.clone());
        Self::with_source(base, config, source)
    }

    /// Resolve histories from any [`HistorySource`], such as a loaded
    /// [`HistoryManifest`](framestack_data::HistoryManifest).
    #[tracing::instrument(
        skip_all,
        fields(samples = base.len(), history_depth = config.history_depth)
    )]
    pub fn with_source<S: HistorySource>(
        base: L,
        config: HistoryConfig,
        source: S,
    ) -> Result<Self, DatasetError> {
        config.validate()?;
        let resolver = FrameResolver::new(source, config.history_depth);
        let frame_lists = resolver.resolve_all(base.image_paths())?;
        info!(
            "Temporal dataset ready: {} samples, up to {} frames each",
            frame_lists.len(),
            config.window_len()
        );
        Ok(Self {
            base,
            config,
            frame_lists,
        })
    }

    pub fn len(&self) -> usize {
        self.frame_lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_lists.is_empty()
    }

    pub fn base(&self) -> &L {
        &self.base
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn frame_list(&self, index: usize) -> Option<&ResolvedFrameList> {
        self.frame_lists.get(index)
    }

    pub fn frame_lists(&self) -> &[ResolvedFrameList] {
        &self.frame_lists
    }

    /// Load the frame stack for sample `index`.
    ///
    /// Listed frames that fail to decode are dropped and reported in
    /// [`LoadedStack::dropped`]; the stack depth is the number of frames that
    /// decoded. Every frame is resized to the target the base loader computes
    /// for the canonical frame, even when history frames differ in size.
    ///
    /// Fails with [`DatasetError::FramesNotFound`] when no listed frame
    /// decodes.
    #[tracing::instrument(skip(self))]
    pub fn load_stack(&self, index: usize, rect_mode: bool) -> Result<LoadedStack, DatasetError> {
        let frames = self
            .frame_lists
            .get(index)
            .ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.frame_lists.len(),
            })?;

        let mut decoded = Vec::with_capacity(frames.len());
        let mut dropped = Vec::new();
        for path in frames {
            match open_rgb(path) {
                Ok(image) => decoded.push(image),
                Err(err) => {
                    debug!("Dropping frame {}: {}", path.display(), err);
                    dropped.push(DroppedFrame {
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        if decoded.is_empty() {
            return Err(DatasetError::FramesNotFound { index });
        }

        let canonical = self.base.load_image(index, rect_mode)?;
        let target = canonical.resized;
        let resized = decoded
            .into_iter()
            .map(|image| resize_to(image, target))
            .collect();
        let stack = FrameStack::new(resized).ok_or(DatasetError::FramesNotFound { index })?;

        if !dropped.is_empty() {
            debug!(
                "Sample {} degraded: {} of {} frames loaded",
                index,
                stack.depth(),
                frames.len()
            );
        }
        Ok(LoadedStack {
            stack,
            original: canonical.original,
            resized: target,
            dropped,
        })
    }
}
