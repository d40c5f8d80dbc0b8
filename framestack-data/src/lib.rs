//! Framestack Data Crate
//!
//! On-disk side of the temporal frame-stacking pipeline: sequential frame
//! naming, the history sidecar format, the per-split history manifest, and the
//! offline builder that writes them. This crate has no image decoding and no
//! knowledge of datasets; the online path lives in `framestack-train`.

pub mod config;
pub mod error;
pub mod history;
pub mod naming;
pub mod sidecar;

pub use config::{HistoryConfig, IndexConfig};
pub use error::DataError;
pub use history::{HistoryIndexBuilder, IndexReport, SplitReport};
pub use naming::{FrameName, has_image_extension};
pub use sidecar::{HistoryManifest, ManifestRecord, read_sidecar, sidecar_path_for, write_sidecar};
