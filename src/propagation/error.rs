//! Error types for build-time asset propagation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropagationError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode asset list: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No server chunk named {file_name}")]
    UnknownChunk { file_name: String },

    #[error(
        "Asset placeholders left unreplaced in {} chunk(s): {}",
        .chunks.len(),
        .chunks.join(", ")
    )]
    Leftover { chunks: Vec<String> },
}

pub type PropagationResult<T> = Result<T, PropagationError>;
