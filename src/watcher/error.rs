//! Error types for the content watcher.

use std::path::PathBuf;
use thiserror::Error;

use crate::content::ContentError;

/// Errors from watcher and tracker operations.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to initialize watcher: {reason}")]
    InitFailed { reason: String },

    #[error("Cannot watch path {path}: {reason}")]
    PathWatchFailed { path: PathBuf, reason: String },

    #[error("Failed to scan content directory {path}: {reason}")]
    ScanFailed { path: PathBuf, reason: String },

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Tracker channel closed unexpectedly")]
    ChannelClosed,
}

impl From<notify::Error> for WatchError {
    fn from(e: notify::Error) -> Self {
        WatchError::InitFailed {
            reason: e.to_string(),
        }
    }
}
