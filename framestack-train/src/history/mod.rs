//! Frame history resolution
//!
//! Maps each canonical frame to the ordered list of frames that make up its
//! temporal window, using either per-frame sidecars or a preloaded manifest.

pub mod resolver;
pub mod source;

pub use resolver::{FrameResolver, ResolvedFrameList, trim_to_window};
pub use source::{HistorySource, SidecarTree};
