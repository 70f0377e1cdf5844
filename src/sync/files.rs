//! File helpers shared by push, pull and status.
use std::fs;
use std::io;
use std::path::Path;

use crate::error::SyncError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub(super) fn ensure_parent_dir(path: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::io("create directory", parent, e))?;
    }
    Ok(())
}

/// Read `path`, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub(super) fn read_optional(path: &Path, action: &'static str) -> Result<Option<Vec<u8>>, SyncError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SyncError::io(action, path, e)),
    }
}

/// Read `path` as UTF-8 text, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub(super) fn read_text_optional(
    path: &Path,
    action: &'static str,
) -> Result<Option<String>, SyncError> {
    read_optional(path, action)?
        .map(|bytes| {
            String::from_utf8(bytes).map_err(|e| {
                SyncError::io(action, path, io::Error::new(io::ErrorKind::InvalidData, e))
            })
        })
        .transpose()
}

/// Write `contents` to `path`, creating parent directories first.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or the write fails.
pub(super) fn write_file(
    path: &Path,
    contents: impl AsRef<[u8]>,
    action: &'static str,
) -> Result<(), SyncError> {
    ensure_parent_dir(path)?;
    fs::write(path, contents).map_err(|e| SyncError::io(action, path, e))
}
