//! Conversation session management.
//!
//! A `Session` owns the transcript and the busy flag that encodes whether a
//! submission is in flight. Turns are committed only once a reply has been
//! received in full.

mod chat;
mod manager;
mod types;


pub use manager::Session;
pub use types::SessionState;
