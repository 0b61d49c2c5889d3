//! ChatProvider implementation for GeminiClient (single `:predict` call).

use async_trait::async_trait;
use tracing::debug;

use crate::selection::ProviderKind;
use crate::{http, AiError, ChatProvider, Reply, Turn};

use super::client::GeminiClient;

#[async_trait]
impl ChatProvider for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn send(&self, transcript: &[Turn]) -> Result<Reply, AiError> {
        let body = Self::build_request_body(transcript)?;
        let url = self.config.predict_url(&self.project)?;
        let token = self.access_token().await?;

        debug!(project = %self.project, location = %self.config.location, "Vertex AI predict request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(http::send_error)?;

        let response = http::check_status(response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        Ok(Reply::Text(Self::parse_response(&json)?))
    }
}
