//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod parse;
pub mod serve;

use std::path::{Path, PathBuf};

use cin_core::models::config::CinConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cin")
        .join("config.json")
}

/// Load the configuration from `--config`, else the default file if it
/// exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CinConfig> {
    if let Some(path) = config_path {
        return Ok(CinConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(CinConfig::from_file(&default_path)?)
    } else {
        Ok(CinConfig::default())
    }
}
