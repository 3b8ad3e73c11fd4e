//! XDG Base Directory utilities for configuration lookup.

use crate::error::ApiError;
use std::path::PathBuf;

/// Application directory name under XDG roots.
pub const APP_DIR: &str = "reclass-meta";

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, ApiError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = std::env::var("HOME").map_err(|_| {
        ApiError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// Global config path without extension; the loader probes supported formats.
///
/// Returns `$XDG_CONFIG_HOME/reclass-meta/config`
pub fn global_config_stem() -> Result<PathBuf, ApiError> {
    Ok(config_home()?.join(APP_DIR).join("config"))
}
