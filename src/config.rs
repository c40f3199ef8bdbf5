//! Configuration module for contentkit.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CK_` and use double underscores
//! to separate nested levels:
//! - `CK_CONTENT__ROOT=docs/content` sets `content.root`
//! - `CK_CONTENT__DEBOUNCE_MS=100` sets `content.debounce_ms`
//! - `CK_BUILD__ASSETS_PREFIX=https://cdn.example.com` sets `build.assets_prefix`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory holding the settings file, relative to the workspace root.
pub const SETTINGS_DIR: &str = ".contentkit";

/// Settings file name inside [`SETTINGS_DIR`].
pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .contentkit is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Content tracking configuration
    #[serde(default)]
    pub content: ContentConfig,

    /// Generated manifest configuration
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// Build-time asset propagation configuration
    #[serde(default)]
    pub build: BuildConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ContentConfig {
    /// Content root directory; first-level subdirectories are collections
    #[serde(default = "default_content_root")]
    pub root: PathBuf,

    /// Extensions recognised as content (document) entries
    #[serde(default = "default_content_extensions")]
    pub content_extensions: Vec<String>,

    /// Extensions recognised as data entries
    #[serde(default = "default_data_extensions")]
    pub data_extensions: Vec<String>,

    /// Reserved content-config file name, resolved inside the content root
    #[serde(default = "default_config_file")]
    pub config_file: String,

    /// Debounce window for bursts of filesystem events
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ManifestConfig {
    /// Directory the manifest is written into
    #[serde(default = "default_manifest_dir")]
    pub out_dir: PathBuf,

    /// Manifest file name
    #[serde(default = "default_manifest_file")]
    pub file_name: String,

    /// Module specifier for the content config type. When unset, the path
    /// of the config file relative to the manifest directory is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_import: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BuildConfig {
    /// Base path prepended to emitted asset URLs
    #[serde(default = "default_base")]
    pub base: String,

    /// Asset prefix; takes precedence over `base` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_prefix: Option<String>,

    /// Importer id prefix that marks a module as a top-level page
    #[serde(default = "default_page_importer_prefix")]
    pub page_importer_prefix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `watcher = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_content_root() -> PathBuf {
    PathBuf::from("src/content")
}
fn default_content_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string(), "markdown".to_string()]
}
fn default_data_extensions() -> Vec<String> {
    vec!["json".to_string(), "yaml".to_string(), "yml".to_string()]
}
fn default_config_file() -> String {
    "config.toml".to_string()
}
fn default_debounce_ms() -> u64 {
    50
}
fn default_manifest_dir() -> PathBuf {
    PathBuf::from(SETTINGS_DIR)
}
fn default_manifest_file() -> String {
    "content-types.d.ts".to_string()
}
fn default_base() -> String {
    "/".to_string()
}
fn default_page_importer_prefix() -> String {
    "\0page:".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            content: ContentConfig::default(),
            manifest: ManifestConfig::default(),
            build: BuildConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_content_root(),
            content_extensions: default_content_extensions(),
            data_extensions: default_data_extensions(),
            config_file: default_config_file(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            out_dir: default_manifest_dir(),
            file_name: default_manifest_file(),
            config_import: None,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            assets_prefix: None,
            page_importer_prefix: default_page_importer_prefix(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .contentkit directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(SETTINGS_DIR).join(SETTINGS_FILE));

        Self::figment(config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                // If workspace_root is not set in config, detect it
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels, single underscore
            // stays inside field names
            .merge(Env::prefixed("CK_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find the settings file by looking for a .contentkit directory,
    /// searching from the current directory up to the filesystem root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    /// Get the workspace root directory (where .contentkit is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(SETTINGS_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Base directory relative paths in the settings resolve against.
    pub fn base_dir(&self) -> PathBuf {
        self.workspace_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Absolute content root.
    pub fn content_root(&self) -> PathBuf {
        resolve(&self.base_dir(), &self.content.root)
    }

    /// Absolute path of the generated manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        resolve(&self.base_dir(), &self.manifest.out_dir).join(&self.manifest.file_name)
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(SETTINGS_DIR).join(SETTINGS_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
