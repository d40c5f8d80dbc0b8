//! Sequential frame file naming: `<prefix>_<6-digit-index>.<ext>`.

use std::path::Path;

/// Number of digits in a frame index.
pub const INDEX_WIDTH: usize = 6;

/// A parsed sequential frame file name.
///
/// Adjacency between frames is arithmetic on [`FrameName::index`]; directory
/// listing order plays no part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameName {
    prefix: String,
    index: u32,
    extension: Option<String>,
}

impl FrameName {
    /// Parse the file name of `path`. Returns `None` when the stem is not
    /// `<prefix>_<6 digits>` or is not valid UTF-8.
    pub fn parse(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let (prefix, index) = Self::parse_stem(stem)?;
        let extension = match path.extension() {
            Some(ext) => Some(ext.to_str()?.to_string()),
            None => None,
        };
        Some(Self {
            prefix: prefix.to_string(),
            index,
            extension,
        })
    }

    /// Split a file stem into its scene prefix and numeric index.
    pub fn parse_stem(stem: &str) -> Option<(&str, u32)> {
        let (prefix, digits) = stem.rsplit_once('_')?;
        if prefix.is_empty()
            || digits.len() != INDEX_WIDTH
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        digits.parse().ok().map(|index| (prefix, index))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Extension as it appeared on disk, without the dot and with original case.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// The same scene frame at another index.
    pub fn with_index(&self, index: u32) -> Self {
        Self {
            index,
            ..self.clone()
        }
    }

    /// The frame `k` positions earlier, if its index would not go below zero.
    pub fn predecessor(&self, k: u32) -> Option<Self> {
        self.index.checked_sub(k).map(|index| self.with_index(index))
    }

    /// The `depth` predecessors followed by this frame, oldest first.
    pub fn window(&self, depth: u32) -> Option<Vec<Self>> {
        (0..=depth).rev().map(|k| self.predecessor(k)).collect()
    }

    /// Render the file name, zero-padding the index.
    pub fn file_name(&self) -> String {
        match &self.extension {
            Some(ext) => format!(
                "{}_{:0width$}.{}",
                self.prefix,
                self.index,
                ext,
                width = INDEX_WIDTH
            ),
            None => format!("{}_{:0width$}", self.prefix, self.index, width = INDEX_WIDTH),
        }
    }
}

/// Whether `path` has one of `extensions`, compared case-insensitively.
/// Entries may be written with or without a leading dot.
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|accepted| accepted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}
