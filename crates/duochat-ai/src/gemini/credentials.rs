//! Service-account key loading and OAuth access-token exchange.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{http, AiError};

pub(crate) const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a Google service-account JSON key that the client needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Claims of the signed assertion exchanged for an access token.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl ServiceAccountKey {
    /// Read and parse a key file. `~/` is expanded to the home directory.
    pub async fn from_file(path: &Path) -> Result<Self, AiError> {
        let path = expand_home(path);
        let data = tokio::fs::read_to_string(&path).await.map_err(|e| {
            AiError::Credentials(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, AiError> {
        let key: Self = serde_json::from_str(data)
            .map_err(|e| AiError::Credentials(format!("invalid service-account key: {e}")))?;
        if key.key_type != "service_account" {
            return Err(AiError::Credentials(format!(
                "unsupported credential type '{}' (expected service_account)",
                key.key_type
            )));
        }
        Ok(key)
    }

    pub(crate) fn assertion_claims(&self, now: i64) -> AssertionClaims {
        AssertionClaims {
            iss: self.client_email.clone(),
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        }
    }

    /// Sign an RS256 assertion with the key's private key.
    pub(crate) fn sign_assertion(&self, now: i64) -> Result<String, AiError> {
        let encoding_key = jsonwebtoken::EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| AiError::Credentials(format!("invalid private key: {e}")))?;

        let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256);
        if !self.private_key_id.is_empty() {
            header.kid = Some(self.private_key_id.clone());
        }

        jsonwebtoken::encode(&header, &self.assertion_claims(now), &encoding_key)
            .map_err(|e| AiError::Credentials(format!("failed to sign assertion: {e}")))
    }

    /// Exchange a fresh assertion for an access token at `token_uri`.
    pub(crate) async fn fetch_access_token(
        &self,
        http_client: &reqwest::Client,
    ) -> Result<AccessToken, AiError> {
        let now = chrono::Utc::now().timestamp();
        let assertion = self.sign_assertion(now)?;

        debug!(client_email = %self.client_email, "Requesting Google access token");

        let response = http_client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(http::send_error)?;

        let response = http::check_status(response)
            .await
            .map_err(|e| AiError::Credentials(format!("token exchange failed: {e}")))?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        AccessToken::from_response(&json, now)
    }
}

/// A short-lived OAuth bearer token.
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    expires_at: i64,
}

impl AccessToken {
    pub(crate) fn from_response(json: &serde_json::Value, now: i64) -> Result<Self, AiError> {
        let token = json["access_token"]
            .as_str()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AiError::Credentials("token response has no access_token".into()))?;
        let expires_in = json["expires_in"].as_i64().unwrap_or(ASSERTION_LIFETIME_SECS);
        Ok(Self {
            token: token.to_string(),
            expires_at: now + expires_in,
        })
    }

    pub fn secret(&self) -> &str {
        &self.token
    }

    pub fn is_fresh(&self, now: i64) -> bool {
        now + EXPIRY_MARGIN_SECS < self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn expand_home(path: &Path) -> std::path::PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
