//! Chat front-end configuration types.

use serde::{Deserialize, Serialize};

/// Provider selected when the session starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DefaultProvider {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "gemini")]
    Gemini,
}

/// Chat front-end configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub default_provider: DefaultProvider,
    /// Heading printed when the session starts.
    pub title: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_provider: DefaultProvider::OpenAi,
            title: "💬 Chatbot".into(),
        }
    }
}
