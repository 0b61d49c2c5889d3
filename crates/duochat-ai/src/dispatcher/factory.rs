//! The production factory: real HTTP clients, cached per credential.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::gemini::{GeminiClient, GeminiConfig};
use crate::openai::{OpenAiClient, OpenAiConfig};
use crate::selection::{Credential, ProviderKind};
use crate::{AiError, ChatProvider};

use super::ProviderFactory;

struct CachedProvider {
    kind: ProviderKind,
    credential: Credential,
    provider: Arc<dyn ChatProvider>,
}

/// Builds `OpenAiClient` / `GeminiClient` instances.
///
/// The last client built is reused while the provider and credential stay
/// the same, so the Vertex access token survives between prompts.
pub struct HttpProviderFactory {
    openai: OpenAiConfig,
    gemini: GeminiConfig,
    cached: Mutex<Option<CachedProvider>>,
}

impl HttpProviderFactory {
    pub fn new(openai: OpenAiConfig, gemini: GeminiConfig) -> Self {
        Self {
            openai,
            gemini,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ProviderFactory for HttpProviderFactory {
    async fn connect(
        &self,
        provider: ProviderKind,
        credential: &Credential,
    ) -> Result<Arc<dyn ChatProvider>, AiError> {
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref() {
            if entry.kind == provider && entry.credential == *credential {
                return Ok(Arc::clone(&entry.provider));
            }
        }

        debug!(provider = provider.id(), "Building provider client");
        let client: Arc<dyn ChatProvider> = match provider {
            ProviderKind::OpenAi => {
                Arc::new(OpenAiClient::new(self.openai.clone(), credential.clone())?)
            }
            ProviderKind::Gemini => {
                let path = Path::new(credential.expose().trim());
                Arc::new(GeminiClient::from_key_file(self.gemini.clone(), path).await?)
            }
        };

        *cached = Some(CachedProvider {
            kind: provider,
            credential: credential.clone(),
            provider: Arc::clone(&client),
        });
        Ok(client)
    }
}
