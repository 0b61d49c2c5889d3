//! duochat configuration system.
//!
//! Provides TOML-based configuration for provider endpoints, models,
//! timeouts and logging. All sections use defaults so partial configs
//! work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! let config = duochat_config::load_config(None).expect("failed to load config");
//! println!("{}", config.openai.model);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::DuochatConfig;
pub use toml_loader::{create_default_config, default_config_path};

use duochat_common::ConfigError;
use std::path::Path;

/// Load config from an explicit path, or from the platform default path.
///
/// An explicit path must exist; the default path may be absent, in which
/// case defaults are returned.
pub fn load_config(path: Option<&Path>) -> Result<DuochatConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &DuochatConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
