//! Mapping from the config file to engine types.

use std::time::Duration;

use duochat_ai::{GeminiConfig, HttpProviderFactory, OpenAiConfig, ProviderKind};
use duochat_config::schema::{DefaultProvider, GeminiSection, OpenAiSection};
use duochat_config::DuochatConfig;

use crate::cli::Args;

pub fn openai_config(section: &OpenAiSection) -> OpenAiConfig {
    OpenAiConfig::new()
        .with_model(section.model.clone())
        .with_base_url(section.base_url.clone())
        .with_temperature(section.temperature)
        .with_timeouts(
            Duration::from_secs(section.connect_timeout_secs),
            Duration::from_secs(section.request_timeout_secs),
        )
}

pub fn gemini_config(section: &GeminiSection) -> GeminiConfig {
    GeminiConfig::new(section.location.clone(), section.endpoint.clone())
        .with_project(section.project.clone())
        .with_api_root(section.api_root.clone())
        .with_timeouts(
            Duration::from_secs(section.connect_timeout_secs),
            Duration::from_secs(section.request_timeout_secs),
        )
}

pub fn build_factory(config: &DuochatConfig) -> HttpProviderFactory {
    HttpProviderFactory::new(openai_config(&config.openai), gemini_config(&config.gemini))
}

/// `--provider` wins over `chat.default_provider`.
pub fn initial_provider(args: &Args, config: &DuochatConfig) -> ProviderKind {
    match args.provider {
        Some(arg) => arg.into(),
        None => match config.chat.default_provider {
            DefaultProvider::OpenAi => ProviderKind::OpenAi,
            DefaultProvider::Gemini => ProviderKind::Gemini,
        },
    }
}

/// `--log-level` wins over `logging.level`; applies to every duochat crate.
pub fn log_directive(args: &Args, config: &DuochatConfig) -> String {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_str());
    format!("duochat={}", level.trim().to_ascii_lowercase())
}
