//! Raw filesystem change events consumed by the tracker.

use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of change reported by the watch service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    AddDir,
    Change,
    Unlink,
    UnlinkDir,
}

impl ChangeKind {
    pub fn is_dir(self) -> bool {
        matches!(self, ChangeKind::AddDir | ChangeKind::UnlinkDir)
    }

    pub fn is_deletion(self) -> bool {
        matches!(self, ChangeKind::Unlink | ChangeKind::UnlinkDir)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::AddDir => "addDir",
            ChangeKind::Change => "change",
            ChangeKind::Unlink => "unlink",
            ChangeKind::UnlinkDir => "unlinkDir",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single change event carrying an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl ContentEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn add(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Add, path)
    }

    pub fn add_dir(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::AddDir, path)
    }

    pub fn change(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Change, path)
    }

    pub fn unlink(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Unlink, path)
    }

    pub fn unlink_dir(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::UnlinkDir, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ContentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.path.display())
    }
}
