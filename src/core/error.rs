//! Error taxonomy for dirnav's filesystem and process boundaries.
//!
//! Every failure that can reach the user is one of the [OpError] variants. The app layer never
//! lets these escape the event loop: they are turned into an Error status message instead.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by the lister, the operation executor and the external process launcher.
#[derive(Debug, Error)]
pub enum OpError {
    /// The directory itself could not be opened (permission denied, not found, ...).
    #[error("cannot read {}: {source}", display_name(.path))]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' already exists", display_name(.0))]
    TargetExists(PathBuf),

    #[error("directory copy is not supported")]
    UnsupportedDirectoryCopy,

    #[error("directory '{}' is not empty", display_name(.0))]
    DirectoryNotEmpty(PathBuf),

    #[error("{0}")]
    CrossFilesystemOrOther(io::Error),

    #[error("{0}")]
    IoError(#[from] io::Error),

    #[error("'{0}' was not found in PATH")]
    ExternalProgramNotFound(String),
}

impl OpError {
    pub fn unreadable(path: &Path, source: io::Error) -> Self {
        OpError::DirectoryUnreadable {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Short form of a path for messages: the file name when there is one.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
