//! Provider choice and the credentials that go with it.

use std::fmt;
use std::str::FromStr;

/// The two supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenAi, ProviderKind::Gemini];

    /// Human-readable name shown in the front-end.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI GPT-3.5",
            ProviderKind::Gemini => "Google Gemini",
        }
    }

    /// Short identifier accepted by `FromStr`.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Name of the credential this provider needs.
    pub fn credential_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI API Key",
            ProviderKind::Gemini => "Google Service Account Key Path",
        }
    }

    /// Instruction shown when the credential is missing.
    pub fn credential_hint(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "Please add your OpenAI API key to continue.",
            ProviderKind::Gemini => {
                "Please provide the path to your Google Service Account key file."
            }
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider '{0}' (expected openai or gemini)")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "gpt" => Ok(ProviderKind::OpenAi),
            "gemini" | "google" | "vertex" => Ok(ProviderKind::Gemini),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// A secret entered by the user: an API key or a key-file path.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret. Never log this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the credential is usable: non-empty after trimming.
    pub fn is_present(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// The active backend plus the credential the user supplied for it.
#[derive(Debug, Clone)]
pub struct ProviderSelection {
    provider: ProviderKind,
    credential: Option<Credential>,
}

impl ProviderSelection {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            credential: None,
        }
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// The credential, if one was supplied and is non-empty.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref().filter(|c| c.is_present())
    }
}

/// Session-scoped credentials for both providers.
///
/// Switching provider keeps what was entered for the other one.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    openai_api_key: Option<Credential>,
    gemini_key_path: Option<Credential>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential; an empty value clears it.
    pub fn set(&mut self, provider: ProviderKind, credential: Credential) {
        let slot = match provider {
            ProviderKind::OpenAi => &mut self.openai_api_key,
            ProviderKind::Gemini => &mut self.gemini_key_path,
        };
        *slot = credential.is_present().then_some(credential);
    }

    pub fn get(&self, provider: ProviderKind) -> Option<&Credential> {
        match provider {
            ProviderKind::OpenAi => self.openai_api_key.as_ref(),
            ProviderKind::Gemini => self.gemini_key_path.as_ref(),
        }
    }

    pub fn has(&self, provider: ProviderKind) -> bool {
        self.get(provider).is_some()
    }

    pub fn selection(&self, provider: ProviderKind) -> ProviderSelection {
        let selection = ProviderSelection::new(provider);
        match self.get(provider) {
            Some(credential) => selection.with_credential(credential.clone()),
            None => selection,
        }
    }
}
