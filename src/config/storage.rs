//! Resolves where configuration and data files live.
//!
//! The config file path comes from the command line, then `CONFIG_PATH`, then
//! `./config.toml`. After the file is read, `CATALOG_PATH` and
//! `CREDENTIALS_PATH` override the data file locations.

use super::settings::{AppConfig, load_config};
use crate::errors::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Picks the config file path, returning it with whether it was chosen explicitly.
fn resolve_config_path(
    cli_path: Option<&Path>,
    lookup: &impl Fn(&str) -> Option<String>,
) -> (PathBuf, bool) {
    if let Some(path) = cli_path {
        return (path.to_path_buf(), true);
    }
    lookup("CONFIG_PATH").map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        |path| (PathBuf::from(path), true),
    )
}

/// Applies `CATALOG_PATH` and `CREDENTIALS_PATH` overrides.
pub fn apply_overrides(config: &mut AppConfig, lookup: &impl Fn(&str) -> Option<String>) {
    if let Some(path) = lookup("CATALOG_PATH") {
        debug!("CATALOG_PATH overrides catalog path with {path}");
        config.catalog.path = PathBuf::from(path);
    }
    if let Some(path) = lookup("CREDENTIALS_PATH") {
        debug!("CREDENTIALS_PATH overrides credentials path with {path}");
        config.auth.credentials_path = PathBuf::from(path);
    }
}

/// Loads, overrides and validates the configuration using the given variable lookup.
///
/// A missing default `config.toml` means defaults; a missing file that was
/// named explicitly is an error.
///
/// # Errors
/// Returns an error if the config file cannot be read or parsed, or if a value
/// is out of range.
pub fn load_with(
    cli_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
    let (path, explicit) = resolve_config_path(cli_path, &lookup);

    let mut config = if explicit || path.exists() {
        debug!("Loading configuration from {:?}", path);
        load_config(&path)?
    } else {
        info!("No {DEFAULT_CONFIG_PATH} found, using default settings");
        AppConfig::default()
    };

    apply_overrides(&mut config, &lookup);
    config.validate()?;
    Ok(config)
}

/// Loads the application configuration from the process environment.
///
/// # Errors
/// See [`load_with`].
pub fn load_app_configuration(cli_path: Option<&Path>) -> Result<AppConfig> {
    load_with(cli_path, |key| std::env::var(key).ok())
}
