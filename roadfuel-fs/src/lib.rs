//! Capability-based UTF-8 file access for the roadfuel tools.
//!
//! Every helper opens the parent directory with ambient authority and then
//! works relative to that handle, so callers only ever touch the file they
//! name.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Open `path` for reading.
///
/// # Errors
/// Returns the underlying IO error when the parent directory or the file
/// cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    let (dir, name) = parent_dir_and_name(path)?;
    dir.open(name)
}

/// Whether `path` names a regular file.
///
/// Directories and other non-file entries yield `Ok(false)`; a missing entry
/// surfaces as an `io::ErrorKind::NotFound` error so callers can tell the
/// two apart.
///
/// # Errors
/// Returns the IO error raised while inspecting the entry.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = parent_dir_and_name(path)?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Open the directory containing `path` and return it with the file name.
///
/// A bare file name resolves against the current directory.
///
/// # Errors
/// Fails when `path` has no file name component or its parent cannot be
/// opened.
pub fn parent_dir_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, &str)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}
