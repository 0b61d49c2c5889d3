//! Provider endpoint configuration types.

use serde::{Deserialize, Serialize};

/// OpenAI chat-completions settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSection {
    pub model: String,
    /// API root; `/chat/completions` is appended.
    pub base_url: String,
    /// Sampling temperature (valid range: 0.0-2.0). Unset uses the provider default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for OpenAiSection {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".into(),
            base_url: "https://api.openai.com/v1".into(),
            temperature: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}

/// Vertex AI prediction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSection {
    /// Region, e.g. `us-central1`. Also selects the regional API host.
    pub location: String,
    /// Endpoint id, `endpoints/<id>`, or `publishers/<publisher>/models/<model>`.
    pub endpoint: String,
    /// Overrides the `project_id` read from the service-account key file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Replaces `https://{location}-aiplatform.googleapis.com`, e.g. for a proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_root: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            location: "us-central1".into(),
            endpoint: String::new(),
            project: None,
            api_root: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
