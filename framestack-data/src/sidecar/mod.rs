//! History sidecar files and the per-split history manifest.
//!
//! This is the on-disk contract between the offline builder and the online
//! resolver. A sidecar is UTF-8 text with one absolute path per line, oldest
//! frame first, the frame named by the sidecar's own stem last, joined with
//! `\n` and no trailing newline.

mod format;
mod manifest;

pub use format::{
    encode_sidecar, parse_sidecar, read_sidecar, sidecar_path_for, with_sidecar_suffix,
    write_sidecar,
};
pub use manifest::{HistoryManifest, ManifestRecord};

pub(crate) use format::write_atomic;
