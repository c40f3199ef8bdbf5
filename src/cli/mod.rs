//! CLI module for contentkit.
//!
//! Provides command-line interface parsing and command dispatch.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::config::{SETTINGS_DIR, Settings};

/// Load settings from an explicit file or by discovery.
///
/// An explicit `<root>/.contentkit/settings.toml` makes `<root>` the
/// workspace root.
pub fn load_settings(config: Option<&Path>) -> anyhow::Result<Settings> {
    let Some(path) = config else {
        return Settings::load().map_err(|e| anyhow!("Configuration error: {e}"));
    };

    let mut settings = Settings::load_from(path)
        .map_err(|e| anyhow!("Configuration error in {}: {e}", path.display()))?;

    if settings.workspace_root.is_none() {
        settings.workspace_root = workspace_for(path);
    }
    Ok(settings)
}

fn workspace_for(config_path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(config_path).ok()?;
    let dir = absolute.parent()?;
    if dir.file_name().is_some_and(|name| name == SETTINGS_DIR) {
        dir.parent().map(Path::to_path_buf)
    } else {
        Some(dir.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_config_sets_workspace_root() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_DIR).join("settings.toml");
        Settings::default().save(&path).unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.workspace_root.as_deref(), Some(temp_dir.path()));
        assert_eq!(settings.content_root(), temp_dir.path().join("src/content"));
    }
}
