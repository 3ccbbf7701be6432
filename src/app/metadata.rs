//! Long-format metadata collection.
//!
//! Failures never abort the listing: the affected fields stay `None` and are
//! rendered as placeholders, while the caller records a warning.

use crate::app::errors::PathError;
use crate::app::models::EntryMetadata;
use std::fs::{self, Metadata};
use std::path::Path;

/// Stats `path` without following a final symlink.
pub fn collect(path: &Path, with_owner: bool) -> (EntryMetadata, Option<PathError>) {
    match fs::symlink_metadata(path) {
        Ok(meta) => (from_metadata(&meta, with_owner), None),
        Err(err) => {
            log::debug!("stat failed for {}: {}", path.display(), err);
            (EntryMetadata::default(), Some(PathError::from_io(path, &err)))
        }
    }
}

pub fn from_metadata(meta: &Metadata, with_owner: bool) -> EntryMetadata {
    EntryMetadata {
        permissions: Some(permissions_string(meta)),
        size: Some(meta.len()),
        modified: meta.modified().ok(),
        owner: if with_owner { owner_name(meta) } else { None },
    }
}

fn type_char(meta: &Metadata) -> char {
    let ft = meta.file_type();
    if ft.is_symlink() {
        return 'l';
    }
    if ft.is_dir() {
        return 'd';
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;

        if ft.is_fifo() {
            return 'p';
        }
        if ft.is_socket() {
            return 's';
        }
        if ft.is_char_device() {
            return 'c';
        }
        if ft.is_block_device() {
            return 'b';
        }
    }

    '-'
}

#[cfg(unix)]
fn permissions_string(meta: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = meta.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(type_char(meta));

    // (shift, special bit, execute char when set, char when set without x)
    for (shift, special, set, unset) in [
        (6u32, 0o4000, 's', 'S'),
        (3, 0o2000, 's', 'S'),
        (0, 0o1000, 't', 'T'),
    ] {
        let bits = (mode >> shift) & 0o7;
        let exec = bits & 0o1 != 0;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(match (mode & special != 0, exec) {
            (true, true) => set,
            (true, false) => unset,
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    out
}

#[cfg(not(unix))]
fn permissions_string(meta: &Metadata) -> String {
    // Only the read-only attribute is meaningful here
    let body = if meta.permissions().readonly() {
        "r--r--r--"
    } else {
        "rw-rw-rw-"
    };
    format!("{}{}", type_char(meta), body)
}

/// Resolves the owning user's name, falling back to the numeric uid.
#[cfg(unix)]
fn owner_name(meta: &Metadata) -> Option<String> {
    use std::ffi::CStr;
    use std::os::unix::fs::MetadataExt;

    let uid = meta.uid();
    // SAFETY: getpwuid accepts any uid; the returned record is only read
    // before the next call on this thread.
    let name = unsafe {
        let pw = libc::getpwuid(uid);
        if pw.is_null() || (*pw).pw_name.is_null() {
            None
        } else {
            CStr::from_ptr((*pw).pw_name)
                .to_str()
                .ok()
                .map(str::to_string)
        }
    };
    Some(name.unwrap_or_else(|| uid.to_string()))
}

#[cfg(not(unix))]
fn owner_name(_meta: &Metadata) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_collect_regular_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"hello").unwrap();

        let (meta, warning) = collect(&file, false);
        assert!(warning.is_none());
        assert_eq!(meta.size, Some(5));
        assert!(meta.modified.is_some());
        assert!(meta.owner.is_none());
        let perms = meta.permissions.unwrap();
        assert_eq!(perms.len(), 10);
        assert!(perms.starts_with('-'));
    }

    #[test]
    fn test_collect_directory_type_char() {
        let dir = tempdir().unwrap();
        let (meta, _) = collect(dir.path(), false);
        assert!(meta.permissions.unwrap().starts_with('d'));
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_present_when_requested() {
        let dir = tempdir().unwrap();
        let (meta, _) = collect(dir.path(), true);
        assert!(meta.owner.is_some_and(|o| !o.is_empty()));
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_bits_rendered() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let file = dir.path().join("script.sh");
        fs::write(&file, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o754)).unwrap();

        let (meta, _) = collect(&file, false);
        assert_eq!(meta.permissions.as_deref(), Some("-rwxr-xr--"));
    }

    #[cfg(unix)]
    #[test]
    fn test_special_mode_bits_rendered() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let sticky = dir.path().join("shared");
        fs::create_dir(&sticky).unwrap();
        fs::set_permissions(&sticky, fs::Permissions::from_mode(0o1777)).unwrap();
        let (meta, _) = collect(&sticky, false);
        assert_eq!(meta.permissions.as_deref(), Some("drwxrwxrwt"));

        fs::set_permissions(&sticky, fs::Permissions::from_mode(0o1776)).unwrap();
        let (meta, _) = collect(&sticky, false);
        assert_eq!(meta.permissions.as_deref(), Some("drwxrwxrwT"));

        let file = dir.path().join("tool");
        fs::write(&file, b"").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o4755)).unwrap();
        let (meta, _) = collect(&file, false);
        assert_eq!(meta.permissions.as_deref(), Some("-rwsr-xr-x"));

        fs::set_permissions(&file, fs::Permissions::from_mode(0o4644)).unwrap();
        let (meta, _) = collect(&file, false);
        assert_eq!(meta.permissions.as_deref(), Some("-rwSr--r--"));
    }

    #[cfg(unix)]
    #[test]
    fn test_socket_type_char() {
        let dir = tempdir().unwrap();
        let sock = dir.path().join("s.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&sock).unwrap();

        let (meta, _) = collect(&sock, false);
        assert!(meta.permissions.unwrap().starts_with('s'));
    }

    #[test]
    fn test_missing_path_yields_placeholders_and_warning() {
        let dir = tempdir().unwrap();
        let (meta, warning) = collect(&dir.path().join("gone"), true);
        assert!(meta.permissions.is_none());
        assert!(meta.size.is_none());
        assert!(meta.owner.is_none());
        assert_eq!(
            warning.map(|w| w.kind),
            Some(crate::app::errors::PathErrorKind::NotFound)
        );
    }
}
