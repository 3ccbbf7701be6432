use crate::app::errors::PathError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::SystemTime;

/// How plain (non-long) entries are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Columns,
    Lines,
}

/// Long-format fields. `None` in a field means collection failed.
#[derive(Debug, Clone, Default)]
pub struct EntryMetadata {
    pub permissions: Option<String>,
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    pub owner: Option<String>,
}

/// A single file or directory as it will appear in the output.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub metadata: Option<EntryMetadata>, // Only populated for long format
}

/// Result of one `list` call.
#[derive(Debug, Default)]
pub struct Listing {
    pub output: String,
    /// Paths that could not be resolved or read at all.
    pub errors: Vec<PathError>,
    /// Recovered problems: placeholder metadata, unreadable subdirectories.
    pub warnings: Vec<PathError>,
    /// Number of path arguments that resolved.
    pub resolved: usize,
}

impl Listing {
    pub fn all_failed(&self) -> bool {
        self.resolved == 0 && !self.errors.is_empty()
    }
}
