//! Sidecar text format and location mapping.

use crate::config::{HistoryConfig, IMAGES_DIR};
use crate::error::DataError;
use std::ffi::OsStr;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Replace the extension of `path` with the sidecar suffix.
pub fn with_sidecar_suffix(path: &Path, suffix: &str) -> PathBuf {
    path.with_extension(suffix.trim_start_matches('.'))
}

/// Expected sidecar location for a canonical image path.
///
/// The first directory component named `images` is swapped for the history
/// subtree name. Paths without such a component get a co-located sidecar.
pub fn sidecar_path_for(image: &Path, config: &HistoryConfig) -> PathBuf {
    let components: Vec<Component<'_>> = image.components().collect();
    let dirs = components.len().saturating_sub(1);
    let images_at = components[..dirs]
        .iter()
        .position(|c| matches!(c, Component::Normal(name) if *name == OsStr::new(IMAGES_DIR)));

    let mapped = match images_at {
        Some(at) => components
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == at {
                    OsStr::new(config.history_dir_name.as_str())
                } else {
                    c.as_os_str()
                }
            })
            .collect::<PathBuf>(),
        None => image.to_path_buf(),
    };
    with_sidecar_suffix(&mapped, &config.sidecar_suffix)
}

/// Render a frame list as sidecar text.
pub fn encode_sidecar(frames: &[PathBuf]) -> Result<String, DataError> {
    let lines = frames
        .iter()
        .map(|p| p.to_str().ok_or_else(|| DataError::NonUtf8Path(p.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Parse sidecar text: surrounding whitespace is ignored and blank lines are
/// skipped.
pub fn parse_sidecar(text: &str) -> Vec<PathBuf> {
    text.trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Read a sidecar. A missing file is `Ok(None)`.
pub fn read_sidecar(path: &Path) -> Result<Option<Vec<PathBuf>>, DataError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(parse_sidecar(&text))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DataError::io(path, e)),
    }
}

/// Write a sidecar, replacing any previous file as a whole.
pub fn write_sidecar(path: &Path, frames: &[PathBuf]) -> Result<(), DataError> {
    let text = encode_sidecar(frames)?;
    write_atomic(path, text.as_bytes())
}

/// Write `bytes` to a temporary file next to `path` and rename it into place,
/// so readers and concurrent writers only ever observe complete files.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DataError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| DataError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| DataError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| DataError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| DataError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| DataError::io(path, e.error))?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
