//! The turn-processing flow: submit, render, commit.

use tracing::debug;

use crate::view::ChatView;
use crate::{AiError, ChatProvider, Reply, Turn};

use super::manager::Session;

impl Session {
    /// Send `prompt` with the stored history to `provider` and render the reply.
    ///
    /// On success the user turn and the assistant turn are both appended and
    /// the assistant turn is returned. On any fault nothing is appended;
    /// fragments already rendered stay on screen.
    pub async fn exchange(
        &mut self,
        provider: &dyn ChatProvider,
        prompt: Turn,
        view: &mut dyn ChatView,
    ) -> Result<Turn, AiError> {
        let _guard = self.begin_turn()?;
        view.show_turn(&prompt);
        self.complete_turn(provider, prompt, view).await
    }

    /// The part of `exchange` after the busy guard is held and the prompt
    /// has been shown.
    pub(crate) async fn complete_turn(
        &mut self,
        provider: &dyn ChatProvider,
        prompt: Turn,
        view: &mut dyn ChatView,
    ) -> Result<Turn, AiError> {
        let kind = provider.kind();
        let mut outgoing = Vec::with_capacity(self.transcript.len() + 1);
        outgoing.extend_from_slice(self.transcript.all());
        outgoing.push(prompt.clone());

        debug!(
            session = %self.id.short(),
            provider = kind.id(),
            turns = outgoing.len(),
            "Submitting prompt"
        );

        let content = match provider.send(&outgoing).await? {
            Reply::Stream(mut stream) => {
                view.begin_reply(kind);
                let mut content = String::new();
                while let Some(fragment) = stream.next_fragment().await {
                    match fragment {
                        Ok(fragment) => {
                            view.show_fragment(&fragment);
                            content.push_str(&fragment);
                        }
                        Err(e) => {
                            view.end_reply();
                            debug!(session = %self.id.short(), "Stream fault after {} bytes", content.len());
                            return Err(e);
                        }
                    }
                }
                view.end_reply();
                content
            }
            Reply::Text(text) => {
                view.begin_reply(kind);
                view.show_fragment(&text);
                view.end_reply();
                text
            }
        };

        let reply = Turn::assistant(content);
        self.commit(prompt, reply.clone());

        debug!(
            session = %self.id.short(),
            turns = self.transcript.len(),
            "Reply committed"
        );
        Ok(reply)
    }
}
