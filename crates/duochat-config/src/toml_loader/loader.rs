//! Core TOML config loading: read from path or platform default.

use crate::schema::DuochatConfig;
use crate::validation;
use duochat_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::default_config_path;

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields, then
/// validates it. A missing file is reported as `ConfigError::FileNotFound`.
pub fn load_from_path(path: &Path) -> Result<DuochatConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let config: DuochatConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    validation::validate(&config)?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/duochat/config.toml`
/// On Linux: `~/.config/duochat/config.toml`
///
/// A missing file yields the defaults; nothing is written.
pub fn load_default() -> Result<DuochatConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, using defaults", path.display());
            Ok(DuochatConfig::default())
        }
        Err(e) => Err(e),
    }
}
