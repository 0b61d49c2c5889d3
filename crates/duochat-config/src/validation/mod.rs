//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod chat;
mod helpers;
mod providers;


use crate::schema::DuochatConfig;
use duochat_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &DuochatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    chat::validate_chat(&mut errors, config);
    providers::validate_openai(&mut errors, config);
    providers::validate_gemini(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
