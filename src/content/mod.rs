//! Content collection tracking.
//!
//! This module provides:
//! - Classification of changed paths below the content root
//! - The in-memory collection map (collection -> entry id -> metadata)
//! - Slug derivation and frontmatter extraction for content entries
//! - The content-config observable and its loader
//! - The generated type manifest

pub mod classify;
pub mod collection;
pub mod config_state;
pub mod error;
pub mod event;
pub mod frontmatter;
pub mod loader;
pub mod manifest;
pub mod slug;

pub use classify::{EntryPath, FileKind, IgnoreReason, classify};
pub use collection::{Collection, CollectionMap, EntryKind, EntryMeta, InsertOutcome};
pub use config_state::{ConfigObserver, ConfigStatus};
pub use error::{ContentError, ContentResult};
pub use event::{ChangeKind, ContentEvent};
pub use frontmatter::{Frontmatter, FrontmatterReader, YamlFrontmatter};
pub use loader::{
    CollectionDefinition, ConfigLoadError, ContentConfigLoader, ContentDefinition,
    TomlConfigLoader,
};
pub use manifest::ManifestWriter;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::Settings;

/// Where content lives and which files count as entries.
///
/// Built once per session from [`Settings`]; every classification and
/// entry-id computation goes through it.
#[derive(Debug, Clone)]
pub struct ContentLayout {
    root: PathBuf,
    config_path: PathBuf,
    content_extensions: BTreeSet<String>,
    data_extensions: BTreeSet<String>,
}

impl ContentLayout {
    pub fn new(
        root: impl Into<PathBuf>,
        config_file: &str,
        content_extensions: impl IntoIterator<Item = impl AsRef<str>>,
        data_extensions: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let root = root.into();
        let config_path = root.join(config_file);
        Self {
            root,
            config_path,
            content_extensions: normalize_extensions(content_extensions),
            data_extensions: normalize_extensions(data_extensions),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.content_root(),
            &settings.content.config_file,
            &settings.content.content_extensions,
            &settings.content.data_extensions,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn content_extensions(&self) -> impl Iterator<Item = &str> {
        self.content_extensions.iter().map(String::as_str)
    }

    pub fn data_extensions(&self) -> impl Iterator<Item = &str> {
        self.data_extensions.iter().map(String::as_str)
    }

    pub fn is_content_extension(&self, ext: &str) -> bool {
        self.content_extensions.contains(&ext.to_ascii_lowercase())
    }

    pub fn is_data_extension(&self, ext: &str) -> bool {
        self.data_extensions.contains(&ext.to_ascii_lowercase())
    }
}

/// Lowercase and strip any leading dot so `.MD` and `md` compare equal.
fn normalize_extensions(exts: impl IntoIterator<Item = impl AsRef<str>>) -> BTreeSet<String> {
    exts.into_iter()
        .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
