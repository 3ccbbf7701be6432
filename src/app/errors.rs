use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single path could not be listed (or listed fully).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathErrorKind {
    NotFound,
    PermissionDenied,
    Other(String),
}

impl From<&io::Error> for PathErrorKind {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => PathErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => PathErrorKind::PermissionDenied,
            _ => PathErrorKind::Other(err.to_string()),
        }
    }
}

impl fmt::Display for PathErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathErrorKind::NotFound => f.write_str("No such file or directory"),
            PathErrorKind::PermissionDenied => f.write_str("Permission denied"),
            PathErrorKind::Other(msg) => f.write_str(msg),
        }
    }
}

/// A per-path failure. Never aborts sibling paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {kind}", path.display())]
pub struct PathError {
    pub path: PathBuf,
    pub kind: PathErrorKind,
}

impl PathError {
    pub fn new(path: impl Into<PathBuf>, kind: PathErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn from_io(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self::new(path, PathErrorKind::from(err))
    }
}

/// Rejected while building a `ListingRequest`, before any traversal.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing path operand")]
    NoPaths,
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("none of the {count} requested path(s) could be listed")]
    AllPathsFailed { count: usize },
}
