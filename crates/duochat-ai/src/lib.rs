//! Chat engine for duochat.
//!
//! Provides the session store, the provider dispatcher and two
//! `ChatProvider` implementations:
//! - OpenAI chat completions with SSE streaming
//! - Vertex AI prediction endpoints authenticated with a service account

pub mod dispatcher;
pub mod gemini;
mod http;
pub mod openai;
pub mod selection;
pub mod session;
pub mod streaming;
pub mod transcript;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use dispatcher::{Dispatcher, HttpProviderFactory, Outcome, ProviderFactory};
pub use gemini::{GeminiClient, GeminiConfig, ServiceAccountKey};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use selection::{Credential, CredentialStore, ProviderKind, ProviderSelection};
pub use session::{Session, SessionState};
pub use streaming::FragmentStream;
pub use transcript::Transcript;
pub use view::ChatView;

/// One backend capable of answering a transcript.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Submit the transcript (ending with the current user turn).
    async fn send(&self, transcript: &[Turn]) -> Result<Reply, AiError>;
}

/// What a provider hands back for a single submission.
#[derive(Debug)]
pub enum Reply {
    /// Incrementally delivered text.
    Stream(FragmentStream),
    /// The whole message at once.
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in the conversation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("Credential error: {0}")]
    Credentials(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Session is busy with another request")]
    Busy,
}

impl From<AiError> for duochat_common::DuochatError {
    fn from(err: AiError) -> Self {
        duochat_common::DuochatError::Provider(err.to_string())
    }
}
