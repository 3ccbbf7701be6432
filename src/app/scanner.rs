use crate::app::errors::{PathError, PathErrorKind};
use crate::app::metadata;
use crate::app::models::DirectoryEntry;
use crate::app::request::ListingRequest;
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// What a path argument turned out to be.
#[derive(Debug)]
pub enum Target {
    /// Listed as itself: a file, or a directory under `-d`.
    Entry(DirectoryEntry),
    /// Listed by its contents.
    Directory(PathBuf),
}

/// Children of one directory, filtered and sorted, plus recovered problems.
#[derive(Debug, Default)]
pub struct ScannedDir {
    pub entries: Vec<DirectoryEntry>,
    pub warnings: Vec<PathError>,
}

pub struct Scanner<'a> {
    request: &'a ListingRequest,
}

impl<'a> Scanner<'a> {
    pub fn new(request: &'a ListingRequest) -> Self {
        Self { request }
    }

    /// Resolves one path argument, following a symlink given directly.
    pub fn resolve(&self, arg: &str) -> Result<(Target, Option<PathError>), PathError> {
        let path = PathBuf::from(arg);

        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            // A dangling symlink still exists as an entry of its own
            Err(err) => match fs::symlink_metadata(&path) {
                Ok(meta) => meta,
                Err(_) => return Err(PathError::from_io(&path, &err)),
            },
        };

        if meta.is_dir() && !self.request.list_dirs_as_entries() {
            return Ok((Target::Directory(path), None));
        }

        let (entry, warning) = self.entry(arg.to_string(), path, meta.is_dir());
        Ok((Target::Entry(entry), warning))
    }

    /// Reads the immediate children of `dir`.
    ///
    /// An unreadable `dir` is an error; problems with individual children
    /// are collected as warnings.
    pub fn scan_dir(&self, dir: &Path) -> Result<ScannedDir, PathError> {
        // Probe first so an unreadable directory is reported against itself
        fs::read_dir(dir).map_err(|err| PathError::from_io(dir, &err))?;

        let mut scanned = ScannedDir::default();

        let walker = WalkBuilder::new(dir)
            .standard_filters(false) // hidden and ignore-file handling is ours
            .follow_links(false)
            .max_depth(Some(1))
            .build();

        for result in walker {
            match result {
                Ok(dent) => {
                    if dent.depth() == 0 {
                        continue;
                    }
                    if !self.keeps(dent.file_name()) {
                        continue;
                    }
                    let name = dent.file_name().to_string_lossy().into_owned();
                    let is_dir = dent.file_type().is_some_and(|ft| ft.is_dir());
                    let (entry, warning) = self.entry(name, dent.into_path(), is_dir);
                    scanned.warnings.extend(warning);
                    scanned.entries.push(entry);
                }
                Err(err) => {
                    log::debug!("Error walking entry in {}: {}", dir.display(), err);
                    let warning = match err.io_error() {
                        Some(io) => PathError::from_io(dir, io),
                        None => PathError::new(dir, PathErrorKind::Other(err.to_string())),
                    };
                    scanned.warnings.push(warning);
                }
            }
        }

        self.sort(&mut scanned.entries);
        Ok(scanned)
    }

    /// Hidden names are dropped first, then the ignore pattern re-excludes
    /// whatever survived, including hidden names shown by `-a`.
    ///
    /// Matching runs on the raw name so non-UTF-8 bytes are not replaced.
    fn keeps(&self, name: &OsStr) -> bool {
        if name.as_encoded_bytes().starts_with(b".") && !self.request.show_hidden() {
            return false;
        }
        !self.request.ignore().is_some_and(|pat| pat.is_match(name))
    }

    /// Byte order of the raw file names; `name` may be lossily decoded.
    fn sort(&self, entries: &mut [DirectoryEntry]) {
        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        if self.request.reverse_sort() {
            entries.reverse();
        }
    }

    fn entry(
        &self,
        name: String,
        path: PathBuf,
        is_dir: bool,
    ) -> (DirectoryEntry, Option<PathError>) {
        let (metadata, warning) = if self.request.long_format() {
            let (meta, warning) = metadata::collect(&path, self.request.show_author());
            (Some(meta), warning)
        } else {
            (None, None)
        };

        (
            DirectoryEntry {
                name,
                path,
                is_dir,
                metadata,
            },
            warning,
        )
    }
}
