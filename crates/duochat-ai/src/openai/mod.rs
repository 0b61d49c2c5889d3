//! OpenAI chat-completions client.
//!
//! Implements `ChatProvider` by streaming `/chat/completions` over SSE.

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
