//! Google Gemini client over Vertex AI prediction endpoints.
//!
//! Authenticates with a service-account key file (JWT bearer grant) and
//! issues one synchronous `:predict` call per prompt.

mod api;
mod client;
mod config;
mod credentials;

pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use credentials::{AccessToken, ServiceAccountKey};
