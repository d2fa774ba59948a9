use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the scan and execute core
///
/// Only `PathNotFound` is ever returned to a caller. Everything else is
/// isolated to one subtree, item or file and reported in aggregate.
#[derive(Debug, Error)]
pub enum TidyError {
    #[error("Library path not found or not a directory: {}", .path.display())]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to read item {}: {source}", .path.display())]
    ItemRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid metadata in {}: {reason}", .path.display())]
    Metadata { path: PathBuf, reason: String },

    #[error("Failed to read directory {}: {message}", .path.display())]
    SubtreeRead { path: PathBuf, message: String },

    #[error("Target already exists: {}", .target.display())]
    MoveCollision { target: PathBuf },

    #[error("Failed to {action} {}: {source}", .path.display())]
    MoveIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type TidyResult<T> = std::result::Result<T, TidyError>;
