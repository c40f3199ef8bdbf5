//! Error types for content tracking.

use std::path::PathBuf;
use thiserror::Error;

use super::collection::EntryKind;

/// Errors produced while handling content events.
///
/// The first four variants are recoverable: the offending file is skipped
/// and the error is reported as a warning at the end of the batch.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Unsupported file type: {path}")]
    UnsupportedFile { path: PathBuf },

    #[error("{path} must be nested in a collection directory. Skipping.")]
    MissingCollection { path: PathBuf },

    #[error("{path} belongs to untracked collection {collection:?}. Skipping.")]
    UntrackedCollection { collection: String, path: PathBuf },

    #[error(
        "{collection:?} contains a mix of content and data entries: {path} is {found}, expected {expected}. All entries must be of the same type."
    )]
    MixedCollection {
        collection: String,
        path: PathBuf,
        expected: EntryKind,
        found: EntryKind,
    },

    #[error("Failed to parse frontmatter in {path}: {reason}")]
    Frontmatter { path: PathBuf, reason: String },

    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// Whether this is the "unsupported file" class, which is batched into a
    /// single combined warning.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ContentError::UnsupportedFile { .. })
    }

    /// Whether the entry was skipped without aborting anything else.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ContentError::UnsupportedFile { .. }
                | ContentError::MissingCollection { .. }
                | ContentError::UntrackedCollection { .. }
                | ContentError::MixedCollection { .. }
        )
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
