//! The display boundary.

use crate::selection::ProviderKind;
use crate::Turn;

/// Whatever renders the conversation: a terminal, a GUI, a test recorder.
pub trait ChatView: Send {
    /// Render a complete turn with its role.
    fn show_turn(&mut self, turn: &Turn);

    /// An assistant reply from `provider` is about to be rendered.
    fn begin_reply(&mut self, provider: ProviderKind);

    /// Render one piece of the reply as it arrives.
    fn show_fragment(&mut self, fragment: &str);

    /// The reply is complete, or was cut short by a fault.
    fn end_reply(&mut self);

    /// Ask the user for the credential `provider` needs.
    fn credential_required(&mut self, provider: ProviderKind);
}
