//! Path classification for content events.
//!
//! Pure discriminator: the same event and layout always produce the same
//! [`FileKind`]. Nothing here touches the filesystem.

use std::path::{Component, PathBuf};

use super::ContentLayout;
use super::event::ContentEvent;

/// Location of an entry file relative to the content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPath {
    /// First-level directory name, or `None` for files sitting directly
    /// under the content root.
    pub collection: Option<String>,
    /// Path relative to the collection directory.
    pub relative: PathBuf,
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Path is not below the content root.
    OutsideRoot,
    /// Directory event below the first level.
    NestedDirectory,
    /// A path segment starts with `_` or `.`.
    Excluded,
    /// Deletion of a file we would not have tracked anyway.
    UnsupportedDeletion,
    /// A path segment is not valid UTF-8.
    NonUtf8Path,
}

/// Classification of a single change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Ignored(IgnoreReason),
    /// First-level directory: a collection.
    Collection { name: String },
    /// The reserved content-config file.
    Config,
    Content(EntryPath),
    Data(EntryPath),
    Unsupported,
}

impl FileKind {
    pub fn is_ignored(&self) -> bool {
        matches!(self, FileKind::Ignored(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Ignored(_) => "ignored",
            FileKind::Collection { .. } => "collection",
            FileKind::Config => "config",
            FileKind::Content(_) => "content",
            FileKind::Data(_) => "data",
            FileKind::Unsupported => "unsupported",
        }
    }
}

/// Classify a change event against the content layout.
pub fn classify(event: &ContentEvent, layout: &ContentLayout) -> FileKind {
    let Ok(relative) = event.path.strip_prefix(layout.root()) else {
        return FileKind::Ignored(IgnoreReason::OutsideRoot);
    };

    let mut segments = Vec::new();
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            let Some(segment) = segment.to_str() else {
                return FileKind::Ignored(IgnoreReason::NonUtf8Path);
            };
            segments.push(segment);
        }
    }

    if segments.is_empty() {
        return FileKind::Ignored(IgnoreReason::OutsideRoot);
    }

    if event.path == layout.config_path() && !event.kind.is_dir() {
        return FileKind::Config;
    }

    if segments.iter().any(|s| is_excluded_segment(s)) {
        return FileKind::Ignored(IgnoreReason::Excluded);
    }

    if event.kind.is_dir() {
        return match segments.as_slice() {
            [name] => FileKind::Collection {
                name: (*name).to_string(),
            },
            _ => FileKind::Ignored(IgnoreReason::NestedDirectory),
        };
    }

    let ext = event
        .path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    if layout.is_content_extension(ext) {
        FileKind::Content(entry_path(&segments))
    } else if layout.is_data_extension(ext) {
        FileKind::Data(entry_path(&segments))
    } else if event.kind.is_deletion() {
        FileKind::Ignored(IgnoreReason::UnsupportedDeletion)
    } else {
        FileKind::Unsupported
    }
}

fn is_excluded_segment(segment: &str) -> bool {
    segment.starts_with('_') || segment.starts_with('.')
}

fn entry_path(segments: &[&str]) -> EntryPath {
    match segments {
        [file] => EntryPath {
            collection: None,
            relative: PathBuf::from(file),
        },
        [collection, rest @ ..] => EntryPath {
            collection: Some((*collection).to_string()),
            relative: rest.iter().collect(),
        },
        [] => EntryPath {
            collection: None,
            relative: PathBuf::new(),
        },
    }
}
