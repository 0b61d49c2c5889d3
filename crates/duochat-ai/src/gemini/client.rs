//! Vertex AI client struct, request building, and response parsing.

use std::path::Path;

use tokio::sync::Mutex;

use crate::{http, AiError, Role, Turn};

use super::config::GeminiConfig;
use super::credentials::{AccessToken, ServiceAccountKey};

/// Vertex AI prediction client bound to one service account.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) key: ServiceAccountKey,
    pub(crate) project: String,
    pub(crate) http: reqwest::Client,
    token: Mutex<Option<AccessToken>>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, key: ServiceAccountKey) -> Result<Self, AiError> {
        let project = config
            .project
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| key.project_id.clone());
        if project.trim().is_empty() {
            return Err(AiError::Credentials(
                "service-account key has no project_id".into(),
            ));
        }

        let http = http::build_client(config.connect_timeout, config.request_timeout)?;
        Ok(Self {
            config,
            key,
            project,
            http,
            token: Mutex::new(None),
        })
    }

    /// Load the key file at `path` and build a client from it.
    pub async fn from_key_file(config: GeminiConfig, path: &Path) -> Result<Self, AiError> {
        let key = ServiceAccountKey::from_file(path).await?;
        Self::new(config, key)
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// A cached access token, refreshed shortly before it expires.
    pub(crate) async fn access_token(&self) -> Result<String, AiError> {
        let mut cached = self.token.lock().await;
        let now = chrono::Utc::now().timestamp();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.secret().to_string());
        }

        let token = self.key.fetch_access_token(&self.http).await?;
        let secret = token.secret().to_string();
        *cached = Some(token);
        Ok(secret)
    }

    /// Build the `:predict` body. Only the current (last user) prompt is sent.
    pub(crate) fn build_request_body(transcript: &[Turn]) -> Result<serde_json::Value, AiError> {
        let prompt = transcript
            .iter()
            .rev()
            .find(|turn| turn.role() == Role::User)
            .ok_or_else(|| AiError::ApiError("no user prompt to send".into()))?;

        Ok(serde_json::json!({
            "instances": [{ "prompt": prompt.content() }]
        }))
    }

    /// Take the first prediction's `content` verbatim.
    pub(crate) fn parse_response(json: &serde_json::Value) -> Result<String, AiError> {
        let predictions = json["predictions"]
            .as_array()
            .ok_or_else(|| AiError::ParseError("no predictions in response".to_string()))?;

        let first = predictions
            .first()
            .ok_or_else(|| AiError::ParseError("empty predictions".to_string()))?;

        first["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| AiError::ParseError("prediction has no content field".to_string()))
    }
}
