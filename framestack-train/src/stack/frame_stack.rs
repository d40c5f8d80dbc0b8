//! Dense `(T, H, W, C)` frame volumes.

use crate::loader::FrameSize;
use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;
use std::path::PathBuf;

/// Channels per pixel (RGB).
pub const CHANNELS: usize = 3;

/// Frames of equal size stacked along a leading temporal axis, stored
/// contiguously in `(T, H, W, C)` order, oldest frame first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStack {
    data: Vec<u8>,
    depth: usize,
    size: FrameSize,
}

impl FrameStack {
    /// Stack `frames` in order. Returns `None` if there are no frames or
    /// their sizes differ.
    pub fn new(frames: Vec<RgbImage>) -> Option<Self> {
        let size = FrameSize::of(frames.first()?);
        if frames.iter().any(|f| FrameSize::of(f) != size) {
            return None;
        }
        let depth = frames.len();
        let mut data = Vec::with_capacity(depth * frame_len(size));
        for frame in frames {
            data.extend_from_slice(frame.as_raw());
        }
        Some(Self { data, depth, size })
    }

    /// Number of frames (T).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn height(&self) -> usize {
        self.size.height as usize
    }

    pub fn width(&self) -> usize {
        self.size.width as usize
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// `[T, H, W, C]`.
    pub fn shape(&self) -> [usize; 4] {
        [self.depth, self.height(), self.width(), CHANNELS]
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// View of frame `t` as an image.
    pub fn frame(&self, t: usize) -> Option<ImageBuffer<Rgb<u8>, &[u8]>> {
        let len = frame_len(self.size);
        let start = t.checked_mul(len)?;
        let end = start.checked_add(len)?;
        let pixels = self.data.get(start..end)?;
        ImageBuffer::from_raw(self.size.width, self.size.height, pixels)
    }

    /// Views of every frame, oldest first.
    pub fn frames(&self) -> impl Iterator<Item = ImageBuffer<Rgb<u8>, &[u8]>> + '_ {
        (0..self.depth).filter_map(move |t| self.frame(t))
    }
}

fn frame_len(size: FrameSize) -> usize {
    size.height as usize * size.width as usize * CHANNELS
}

/// A listed frame that could not be decoded and was left out of the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedFrame {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading one temporal sample.
#[derive(Debug, Clone)]
pub struct LoadedStack {
    pub stack: FrameStack,
    /// Size of the canonical frame on disk.
    pub original: FrameSize,
    /// Size every frame in the stack was resized to.
    pub resized: FrameSize,
    /// Listed frames that failed to decode, in list order.
    pub dropped: Vec<DroppedFrame>,
}

impl LoadedStack {
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Whether any listed frame was dropped.
    pub fn is_degraded(&self) -> bool {
        !self.dropped.is_empty()
    }

    /// `(stack, (h0, w0), (h, w))`, the single-frame loader's return shape.
    pub fn into_parts(self) -> (FrameStack, (u32, u32), (u32, u32)) {
        (self.stack, self.original.as_hw(), self.resized.as_hw())
    }
}
