//! Init and Config commands.

use anyhow::{Context, anyhow};

use crate::config::{SETTINGS_DIR, SETTINGS_FILE, Settings};

/// Run init command - create configuration file.
pub fn run_init(force: bool) -> anyhow::Result<()> {
    let config_path = std::path::Path::new(SETTINGS_DIR).join(SETTINGS_FILE);

    if config_path.exists() && !force {
        return Err(anyhow!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        ));
    }

    let path = Settings::init_config_file(force).map_err(|e| anyhow!("{e}"))?;
    println!("Created configuration file at: {}", path.display());
    println!("Edit this file to customize your settings.");
    Ok(())
}

/// Run config command - display current configuration.
pub fn run_config(config: &Settings) -> anyhow::Result<()> {
    let toml_str = toml::to_string_pretty(config).context("Error displaying config")?;
    println!("Current Configuration:");
    println!("{}", "=".repeat(50));
    println!("{toml_str}");
    Ok(())
}
