//! Session struct and transcript access.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use duochat_common::SessionId;

use crate::transcript::Transcript;
use crate::Turn;

use super::types::{BusyGuard, SessionState};
use crate::AiError;

/// One interactive conversation.
pub struct Session {
    pub(super) id: SessionId,
    pub(super) transcript: Transcript,
    pub(super) busy: Arc<AtomicBool>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            transcript: Transcript::new(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The full ordered history.
    pub fn turns(&self) -> &[Turn] {
        self.transcript.all()
    }

    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }

    pub fn state(&self) -> SessionState {
        if self.busy.load(Ordering::Acquire) {
            SessionState::AwaitingResponse
        } else {
            SessionState::Idle
        }
    }

    pub(crate) fn begin_turn(&self) -> Result<BusyGuard, AiError> {
        BusyGuard::acquire(&self.busy)
    }

    /// Append a completed exchange.
    pub(super) fn commit(&mut self, user: Turn, assistant: Turn) {
        self.transcript.append(user);
        self.transcript.append(assistant);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("turns", &self.transcript.len())
            .field("state", &self.state())
            .finish()
    }
}
