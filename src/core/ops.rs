//! Mutating file operations for dirnav: rename/move, copy and delete.
//!
//! Each operation is described by an [OperationIntent] and performed by [execute], which
//! returns the success text for the status line. Confirmation is the caller's job.

use crate::core::error::OpError;
use crate::utils::{expand_home_path, normalize_path};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// A confirmed mutation waiting to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationIntent {
    Rename {
        source: PathBuf,
        destination: PathBuf,
    },
    Copy {
        source: PathBuf,
        destination: PathBuf,
        overwrite: bool,
    },
    Delete {
        target: PathBuf,
    },
}

impl OperationIntent {
    /// The path the operation starts from.
    pub fn source(&self) -> &Path {
        match self {
            OperationIntent::Rename { source, .. } | OperationIntent::Copy { source, .. } => {
                source
            }
            OperationIntent::Delete { target } => target,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            OperationIntent::Rename { .. } => "Rename",
            OperationIntent::Copy { .. } => "Copy",
            OperationIntent::Delete { .. } => "Delete",
        }
    }
}

/// Performs the intent and returns the message to show on success.
pub fn execute(intent: &OperationIntent) -> Result<String, OpError> {
    debug!(?intent, "executing");
    let message = match intent {
        OperationIntent::Rename {
            source,
            destination,
        } => {
            rename(source, destination)?;
            if source.parent() == destination.parent() {
                format!("Renamed '{}' to '{}'.", file_name(source), file_name(destination))
            } else {
                format!("Moved '{}' to '{}'.", file_name(source), destination.display())
            }
        }
        OperationIntent::Copy {
            source,
            destination,
            overwrite,
        } => {
            copy(source, destination, *overwrite)?;
            format!("Copied '{}' to '{}'.", file_name(source), destination.display())
        }
        OperationIntent::Delete { target } => {
            delete(target)?;
            format!("Deleted '{}'.", file_name(target))
        }
    };
    info!(%message, "operation done");
    Ok(message)
}

/// Moves `source` to `destination`.
///
/// Refuses to replace any existing path. The one exception is a case-only rename where
/// both names already point at the same file on a case-insensitive filesystem.
pub fn rename(source: &Path, destination: &Path) -> Result<(), OpError> {
    if source == destination {
        return Ok(());
    }
    if destination_exists(destination) && !is_case_only_rename(source, destination) {
        return Err(OpError::TargetExists(destination.to_path_buf()));
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) => move_after_failed_rename(source, destination, e),
    }
}

/// Only a regular file that failed to rename across filesystems is copied and removed.
/// Symlinks, directories and every other error report the rename error.
fn move_after_failed_rename(
    source: &Path,
    destination: &Path,
    err: io::Error,
) -> Result<(), OpError> {
    if err.kind() != ErrorKind::CrossesDevices || !is_regular_file(source) {
        return Err(OpError::CrossFilesystemOrOther(err));
    }
    debug!(src = %source.display(), "cross-device move, copying instead");
    copy(source, destination, false)?;
    fs::remove_file(source).map_err(OpError::CrossFilesystemOrOther)
}

/// Copies a regular file, keeping permission bits and mtime when the platform allows.
///
/// The bytes go to a temp file next to the destination which is then persisted over it,
/// so a failed copy never leaves a partial destination behind.
pub fn copy(source: &Path, destination: &Path, overwrite: bool) -> Result<(), OpError> {
    let meta = fs::metadata(source)?;
    if meta.is_dir() {
        return Err(OpError::UnsupportedDirectoryCopy);
    }
    if !overwrite && destination_exists(destination) {
        return Err(OpError::TargetExists(destination.to_path_buf()));
    }

    let dest_dir = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut src = File::open(source)?;
    let mut tmp = NamedTempFile::new_in(dest_dir)?;
    io::copy(&mut src, tmp.as_file_mut())?;

    if let Err(e) = tmp.as_file().set_permissions(meta.permissions()) {
        debug!(error = %e, "could not copy permissions");
    }
    if let Ok(mtime) = meta.modified()
        && let Err(e) = tmp.as_file().set_modified(mtime)
    {
        debug!(error = %e, "could not copy modification time");
    }

    tmp.persist(destination).map_err(|e| OpError::IoError(e.error))?;
    Ok(())
}

/// Removes a file, a symlink or an empty directory.
pub fn delete(target: &Path) -> Result<(), OpError> {
    let meta = fs::symlink_metadata(target)?;
    if !meta.is_dir() {
        fs::remove_file(target)?;
        return Ok(());
    }

    if fs::read_dir(target)?.next().is_some() {
        return Err(OpError::DirectoryNotEmpty(target.to_path_buf()));
    }
    fs::remove_dir(target).map_err(|e| {
        if e.kind() == ErrorKind::DirectoryNotEmpty {
            OpError::DirectoryNotEmpty(target.to_path_buf())
        } else {
            OpError::IoError(e)
        }
    })
}

/// True if anything, including a dangling symlink, occupies `path`.
pub fn destination_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Resolves what the user typed into a destination path for `source`.
///
/// Relative input is taken from `current_dir`, `~` is expanded and `.`/`..` are folded
/// lexically. Naming an existing directory means "into it". Blank input gives `None`.
pub fn resolve_destination(current_dir: &Path, input: &str, source: &Path) -> Option<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let expanded = expand_home_path(input);
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        current_dir.join(expanded)
    };
    let mut dest = normalize_path(&joined);

    if dest != source
        && dest.is_dir()
        && let Some(name) = source.file_name()
    {
        dest.push(name);
    }
    Some(dest)
}

fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_file())
}

fn is_case_only_rename(source: &Path, destination: &Path) -> bool {
    let (a, b) = (source.to_string_lossy(), destination.to_string_lossy());
    a != b && a.to_lowercase() == b.to_lowercase() && is_same_file(source, destination)
}

#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
