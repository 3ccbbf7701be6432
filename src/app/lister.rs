//! The listing engine: turns a `ListingRequest` into output text plus
//! per-path diagnostics.
//!
//! Paths are handled strictly in input order. A path that cannot be resolved
//! is recorded and skipped; it never affects the output of the others.

use crate::app::errors::{PathError, PathErrorKind};
use crate::app::formatter::OutputGenerator;
use crate::app::models::{DirectoryEntry, Listing};
use crate::app::request::ListingRequest;
use crate::app::scanner::{ScannedDir, Scanner, Target};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub fn list(request: &ListingRequest) -> Listing {
    let scanner = Scanner::new(request);
    let mut listing = Listing::default();

    // Top-level directories are read up front so only listable paths count
    // towards the header decision.
    let mut resolved = Vec::new();
    for arg in request.paths() {
        match scanner.resolve(arg) {
            Ok((Target::Entry(entry), warning)) => {
                listing.warnings.extend(warning);
                resolved.push(Resolved::Entry(entry));
            }
            Ok((Target::Directory(path), _)) => match scanner.scan_dir(&path) {
                Ok(scanned) => resolved.push(Resolved::Directory(path, scanned)),
                Err(err) => listing.errors.push(err),
            },
            Err(err) => listing.errors.push(err),
        }
    }
    listing.resolved = resolved.len();

    let mut walk = Walk {
        scanner: &scanner,
        generator: OutputGenerator::new(request),
        recursive: request.recursive(),
        headed: request.recursive() || resolved.len() > 1,
        visited: HashSet::new(),
        warnings: Vec::new(),
    };

    let mut groups: Vec<String> = Vec::new();
    // Consecutive file arguments share one group
    let mut files: Vec<DirectoryEntry> = Vec::new();

    for target in resolved {
        match target {
            Resolved::Entry(entry) => files.push(entry),
            Resolved::Directory(path, scanned) => {
                if !files.is_empty() {
                    groups.push(walk.generator.render(&files));
                    files.clear();
                }

                walk.visited.clear();
                walk.remember(&path);
                walk.emit(&path, scanned, &mut groups);
            }
        }
    }
    if !files.is_empty() {
        groups.push(walk.generator.render(&files));
    }

    listing.warnings.append(&mut walk.warnings);
    groups.retain(|g| !g.is_empty());
    listing.output = groups.join("\n");
    listing
}

/// A path argument that can be listed.
enum Resolved {
    Entry(DirectoryEntry),
    Directory(PathBuf, ScannedDir),
}

struct Walk<'s, 'r> {
    scanner: &'s Scanner<'r>,
    generator: OutputGenerator,
    recursive: bool,
    headed: bool,
    visited: HashSet<PathBuf>,
    warnings: Vec<PathError>,
}

impl Walk<'_, '_> {
    /// Emits the group for an already scanned directory, then (when
    /// recursive) its subdirectories depth-first in listing order.
    fn emit(&mut self, display: &Path, scanned: ScannedDir, groups: &mut Vec<String>) {
        self.warnings.extend(scanned.warnings);

        let mut group = String::new();
        if self.headed {
            group.push_str(&format!("{}:\n", display.display()));
        }
        group.push_str(&self.generator.render(&scanned.entries));
        groups.push(group);

        if !self.recursive {
            return;
        }

        for child in scanned.entries.iter().filter(|e| e.is_dir) {
            if !self.remember(&child.path) {
                log::debug!("already listed {}, not descending", child.path.display());
                self.warnings.push(PathError::new(
                    &child.path,
                    PathErrorKind::Other("directory already listed; not descending".into()),
                ));
                continue;
            }

            // An unreadable subdirectory only costs its own group
            match self.scanner.scan_dir(&child.path) {
                Ok(child_scan) => self.emit(&display.join(&child.name), child_scan, groups),
                Err(err) => self.warnings.push(err),
            }
        }
    }

    /// Returns false if this directory was already visited under this argument.
    fn remember(&mut self, path: &Path) -> bool {
        match fs::canonicalize(path) {
            Ok(canonical) => self.visited.insert(canonical),
            Err(_) => true,
        }
    }
}
