//! Temporal frame stacks
//!
//! A [`TemporalDataset`] wraps a single-frame [`FrameLoader`](crate::loader::FrameLoader)
//! and, for each sample, stacks the sample's resolved frame window into a
//! [`FrameStack`].

pub mod dataset;
pub mod frame_stack;

pub use dataset::TemporalDataset;
pub use frame_stack::{CHANNELS, DroppedFrame, FrameStack, LoadedStack};
