//! Provider dispatcher: routes one prompt to the selected backend.
//!
//! The dispatcher owns the pre-flight rules (empty prompts are ignored,
//! missing credentials short-circuit before any call) and obtains a
//! `ChatProvider` from a `ProviderFactory` once the session is marked busy
//! and the prompt is on screen.

mod factory;


use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::selection::{Credential, ProviderKind, ProviderSelection};
use crate::session::Session;
use crate::view::ChatView;
use crate::{AiError, ChatProvider, Turn};

pub use factory::HttpProviderFactory;

/// Builds an authenticated provider from a credential.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    async fn connect(
        &self,
        provider: ProviderKind,
        credential: &Credential,
    ) -> Result<Arc<dyn ChatProvider>, AiError>;
}

/// Result of one submission that did not fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The prompt was blank; nothing happened.
    Ignored,
    /// The selected provider has no credential; the user was asked for one.
    CredentialRequired(ProviderKind),
    /// The assistant turn that was committed.
    Replied(Turn),
}

pub struct Dispatcher<F = HttpProviderFactory> {
    factory: F,
}

impl<F: ProviderFactory> Dispatcher<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Submit `prompt` under `selection`.
    ///
    /// Provider faults are returned as `Err` and leave the session's
    /// transcript as it was before the call.
    pub async fn submit(
        &self,
        session: &mut Session,
        selection: &ProviderSelection,
        prompt: &str,
        view: &mut dyn ChatView,
    ) -> Result<Outcome, AiError> {
        if prompt.trim().is_empty() {
            return Ok(Outcome::Ignored);
        }

        let kind = selection.provider();
        let Some(credential) = selection.credential() else {
            debug!(session = %session.id().short(), provider = kind.id(), "Credential missing, not dispatching");
            view.credential_required(kind);
            return Ok(Outcome::CredentialRequired(kind));
        };

        let prompt = Turn::user(prompt);
        let _guard = session.begin_turn()?;
        view.show_turn(&prompt);

        let provider = self.factory.connect(kind, credential).await?;
        let reply = session
            .complete_turn(provider.as_ref(), prompt, view)
            .await?;
        Ok(Outcome::Replied(reply))
    }
}
