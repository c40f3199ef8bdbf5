//! Content-config definitions and the loader that produces them.
//!
//! The config file is reloaded wholesale on every change; there is no
//! partial update path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collection::EntryKind;

/// User-authored definition of zero or more collections.
///
/// ```toml
/// [collections.blog]
/// type = "content"
///
/// [collections.blog.schema]
/// title = "string"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDefinition {
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionDefinition {
    /// Declared kind; used for collections that have no entries yet.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,

    /// Field schema. Its presence means entries are validated and get a
    /// concrete inferred type in the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<toml::Table>,
}

impl ContentDefinition {
    pub fn collection(&self, name: &str) -> Option<&CollectionDefinition> {
        self.collections.get(name)
    }

    /// Whether the named collection has a validating schema.
    pub fn validates(&self, name: &str) -> bool {
        self.collection(name).is_some_and(|c| c.schema.is_some())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

/// Errors from loading the content config.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Cannot read content config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid content config {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Loads the content config file.
///
/// `Ok(None)` means no config file exists.
#[async_trait]
pub trait ContentConfigLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<Option<ContentDefinition>, ConfigLoadError>;
}

/// Default loader reading a TOML file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlConfigLoader;

#[async_trait]
impl ContentConfigLoader for TomlConfigLoader {
    async fn load(&self, path: &Path) -> Result<Option<ContentDefinition>, ConfigLoadError> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigLoadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&text)
            .map(Some)
            .map_err(|e| ConfigLoadError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let result = TomlConfigLoader
            .load(&temp_dir.path().join("config.toml"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_parses_collections() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[collections.blog]
type = "content"

[collections.blog.schema]
title = "string"

[collections.authors]
type = "data"
"#,
        )
        .unwrap();

        let def = TomlConfigLoader.load(&path).await.unwrap().unwrap();
        assert_eq!(def.names().collect::<Vec<_>>(), vec!["authors", "blog"]);
        assert!(def.validates("blog"));
        assert!(!def.validates("authors"));
        assert_eq!(
            def.collection("authors").unwrap().kind,
            Some(EntryKind::Data)
        );
    }

    #[tokio::test]
    async fn test_invalid_toml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[collections.blog\n").unwrap();

        let err = TomlConfigLoader.load(&path).await.unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }
}
