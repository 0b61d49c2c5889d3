use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DuochatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("provider error: {0}")]
    Provider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("openai.model must not be empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: openai.model must not be empty"
        );
    }

    #[test]
    fn duochat_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: DuochatError = config_err.into();
        assert!(matches!(err, DuochatError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn duochat_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: DuochatError = io_err.into();
        assert!(matches!(err, DuochatError::Io(_)));
        assert!(err.to_string().contains("stdout closed"));
    }

    #[test]
    fn duochat_error_provider_display() {
        let err = DuochatError::Provider("HTTP 401".into());
        assert_eq!(err.to_string(), "provider error: HTTP 401");
    }
}
