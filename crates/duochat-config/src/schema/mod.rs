//! Configuration schema types for duochat.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Credentials are absent on purpose: they are entered per session.

mod chat;
mod providers;
mod system;

pub use chat::*;
pub use providers::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for duochat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DuochatConfig {
    pub chat: ChatConfig,
    pub openai: OpenAiSection,
    pub gemini: GeminiSection,
    pub logging: LoggingConfig,
}
