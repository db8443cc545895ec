//! Loader settings with persistence
//!
//! Settings are read from `~/.config/meshloader/loader.toml` unless a path
//! is given on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use meshloader_assets::LoaderConfig;
use tracing::{info, warn};

/// Get the config directory path
fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("meshloader"))
}

/// Get the settings file path
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("loader.toml"))
}

/// Load settings from the user config directory, or defaults if not found
pub fn load_user() -> LoaderConfig {
    let Some(path) = settings_path() else {
        warn!("Could not determine config directory");
        return LoaderConfig::default();
    };
    load_or_default(&path)
}

/// Load settings from `path`, falling back to defaults on any problem
pub fn load_or_default(path: &Path) -> LoaderConfig {
    if !path.exists() {
        info!("No settings file at {:?}, using defaults", path);
        return LoaderConfig::default();
    }

    match LoaderConfig::load(path) {
        Ok(config) => {
            info!("Loaded settings from {:?}", path);
            config
        }
        Err(e) => {
            warn!("{}, using defaults", e);
            LoaderConfig::default()
        }
    }
}

/// Save settings to the user config directory
pub fn save_user(config: &LoaderConfig) -> anyhow::Result<PathBuf> {
    let Some(dir) = config_dir() else {
        anyhow::bail!("Could not determine config directory");
    };
    let path = dir.join("loader.toml");
    save_to(config, &path)?;
    Ok(path)
}

/// Save settings to `path`, creating parent directories
pub fn save_to(config: &LoaderConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    let content = config.to_toml_string()?;
    fs::write(path, content)?;
    info!("Saved settings to {:?}", path);
    Ok(())
}
