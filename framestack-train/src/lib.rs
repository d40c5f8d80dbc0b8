//! Framestack Training Data Crate
//!
//! Turns a list of single-image samples into temporal samples: each canonical
//! frame is paired with its recorded history window, and every fetch decodes,
//! resizes and stacks the window into one `(T, H, W, C)` volume.
//!
//! ## Modules
//!
//! - [`history`]: Frame resolution from sidecars or a history manifest
//! - [`loader`]: Single-frame loading contract and an image-folder implementation
//! - [`stack`]: Frame stacks and the temporal dataset that produces them

pub mod error;
pub mod history;
pub mod loader;
pub mod stack;

pub use error::DatasetError;
pub use history::{FrameResolver, HistorySource, ResolvedFrameList, SidecarTree};
pub use loader::{FrameLoader, FrameSize, ImageFolderLoader, LoadedFrame};
pub use stack::{DroppedFrame, FrameStack, LoadedStack, TemporalDataset};

pub use framestack_data::{HistoryConfig, HistoryManifest};
