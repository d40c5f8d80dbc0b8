//! Single-frame loading
//!
//! The [`FrameLoader`] trait is the contract the temporal dataset builds on:
//! it owns the sample list and decides how a canonical frame is sized.

pub mod folder;
pub mod frame;

pub use folder::{DEFAULT_IMAGE_SIZE, ImageFolderLoader, target_size};
pub use frame::{FrameLoader, FrameSize, LoadedFrame, decode_rgb, open_rgb, resize_to};
