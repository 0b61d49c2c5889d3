//! OpenAI client struct, request building, and stream-chunk parsing.

use crate::selection::Credential;
use crate::{http, AiError, Turn};

use super::config::OpenAiConfig;

/// OpenAI chat-completions client, authenticated with one API key.
pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) api_key: Credential,
    pub(crate) http: reqwest::Client,
}

/// One decoded `data:` payload of a completions stream.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum StreamChunk {
    Fragment(String),
    /// Role announcements, finish markers and other content-free chunks.
    Empty,
    Done,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig, api_key: Credential) -> Result<Self, AiError> {
        if !api_key.is_present() {
            return Err(AiError::Credentials("OpenAI API key is empty".into()));
        }
        let http = http::build_client(config.connect_timeout, config.request_timeout)?;
        Ok(Self {
            config,
            api_key,
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Build the streaming request body: the whole transcript, in order.
    pub(crate) fn build_request_body(&self, transcript: &[Turn]) -> serde_json::Value {
        let messages: Vec<_> = transcript
            .iter()
            .map(|turn| {
                serde_json::json!({
                    "role": turn.role().as_str(),
                    "content": turn.content(),
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "stream": true,
        });

        if let Some(temperature) = self.config.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        body
    }

    /// Decode one SSE `data:` payload.
    pub(crate) fn parse_stream_chunk(data: &str) -> Result<StreamChunk, AiError> {
        let data = data.trim();
        if data == "[DONE]" {
            return Ok(StreamChunk::Done);
        }

        let json: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| AiError::ParseError(format!("invalid stream chunk: {e}")))?;

        if let Some(error) = json.get("error") {
            let message = error["message"].as_str().unwrap_or("unknown error");
            return Err(AiError::ApiError(message.to_string()));
        }

        let text = json["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice["delta"]["content"].as_str())
            .unwrap_or_default();

        if text.is_empty() {
            Ok(StreamChunk::Empty)
        } else {
            Ok(StreamChunk::Fragment(text.to_string()))
        }
    }
}
