use crate::core::error::{OctoError, OctoResult};
use std::path::PathBuf;

/// Get the OctoCheese configuration directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\octocheese
/// - Linux: ~/.config/octocheese
/// - macOS: ~/Library/Application Support/octocheese
pub fn octocheese_home() -> OctoResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| OctoError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("octocheese"))
}

/// Get the config file path (`<config dir>/octocheese/config.yaml`)
pub fn config_file() -> OctoResult<PathBuf> {
    Ok(octocheese_home()?.join("config.yaml"))
}
