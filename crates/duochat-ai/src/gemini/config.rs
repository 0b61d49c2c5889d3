//! Vertex AI endpoint configuration.

use std::time::Duration;

use crate::AiError;

/// Vertex AI client configuration. Credentials come from the key file.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub location: String,
    pub endpoint: String,
    /// Overrides the key file's `project_id`.
    pub project: Option<String>,
    /// Replaces the regional `https://{location}-aiplatform.googleapis.com` host.
    pub api_root: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            location: "us-central1".to_string(),
            endpoint: String::new(),
            project: None,
            api_root: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl GeminiConfig {
    pub fn new(location: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project;
        self
    }

    pub fn with_api_root(mut self, api_root: Option<String>) -> Self {
        self.api_root = api_root.filter(|root| !root.trim().is_empty());
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    /// Full resource name of the endpoint for `project`.
    ///
    /// Accepts a bare endpoint id, `endpoints/<id>`,
    /// `publishers/<publisher>/models/<model>`, or a full `projects/...` name.
    pub(crate) fn resource_name(&self, project: &str) -> Result<String, AiError> {
        let endpoint = self.endpoint.trim().trim_matches('/');
        if endpoint.is_empty() {
            return Err(AiError::Config(
                "gemini.endpoint is not configured".to_string(),
            ));
        }

        if endpoint.starts_with("projects/") {
            return Ok(endpoint.to_string());
        }

        let path = if endpoint.starts_with("endpoints/") || endpoint.starts_with("publishers/") {
            endpoint.to_string()
        } else if endpoint.contains('/') {
            return Err(AiError::Config(format!(
                "unrecognised gemini.endpoint '{endpoint}'"
            )));
        } else {
            format!("endpoints/{endpoint}")
        };

        Ok(format!(
            "projects/{project}/locations/{}/{path}",
            self.location
        ))
    }

    pub(crate) fn api_root(&self) -> String {
        match &self.api_root {
            Some(root) => root.trim().trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }

    pub(crate) fn predict_url(&self, project: &str) -> Result<String, AiError> {
        Ok(format!(
            "{}/v1/{}:predict",
            self.api_root(),
            self.resource_name(project)?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id_becomes_endpoint_resource() {
        let config = GeminiConfig::new("us-central1", "1234567890");
        assert_eq!(
            config.resource_name("my-proj").unwrap(),
            "projects/my-proj/locations/us-central1/endpoints/1234567890"
        );
    }

    #[test]
    fn publisher_model_path_is_kept() {
        let config = GeminiConfig::new("europe-west4", "publishers/google/models/text-bison");
        assert_eq!(
            config.predict_url("p").unwrap(),
            "https://europe-west4-aiplatform.googleapis.com/v1/projects/p/locations/europe-west4/publishers/google/models/text-bison:predict"
        );
    }

    #[test]
    fn api_root_replaces_regional_host() {
        let config = GeminiConfig::new("us-central1", "42")
            .with_api_root(Some("http://127.0.0.1:9000/".into()));
        assert_eq!(
            config.predict_url("p").unwrap(),
            "http://127.0.0.1:9000/v1/projects/p/locations/us-central1/endpoints/42:predict"
        );

        let config = GeminiConfig::new("us-central1", "42").with_api_root(Some("  ".into()));
        assert!(config.api_root.is_none());
        assert_eq!(config.api_root(), "https://us-central1-aiplatform.googleapis.com");
    }

    #[test]
    fn full_resource_name_is_used_as_is() {
        let config = GeminiConfig::new(
            "us-central1",
            "projects/other/locations/us-central1/endpoints/9",
        );
        assert_eq!(
            config.resource_name("ignored").unwrap(),
            "projects/other/locations/us-central1/endpoints/9"
        );
    }

    #[test]
    fn missing_endpoint_is_config_error() {
        let config = GeminiConfig::default();
        assert!(matches!(
            config.predict_url("p"),
            Err(AiError::Config(_))
        ));
    }

    #[test]
    fn unknown_path_shape_is_rejected() {
        let config = GeminiConfig::new("us-central1", "models/whatever");
        assert!(config.resource_name("p").is_err());
    }
}
