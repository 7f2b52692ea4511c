//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    let config: ProxyConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the startup configuration.
///
/// With no path the built-in defaults are used, which match the reference
/// deployment. Defaults are validated the same way as file contents.
pub fn resolve_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = ProxyConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [[backends]]
            address = "http://10.0.0.1:80"

            [[backends]]
            address = "http://10.0.0.2:80/api"

            [timeouts]
            request_secs = 10

            [shutdown]
            grace_period_secs = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends[1].address, "http://10.0.0.2:80/api");
        assert_eq!(config.timeouts.request_secs, 10);
        assert_eq!(config.timeouts.connect_secs, 5);
        assert_eq!(config.shutdown.grace_period_secs, 2);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn empty_file_uses_reference_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        let addresses: Vec<_> = config.backends.iter().map(|b| b.address.as_str()).collect();
        assert_eq!(
            addresses,
            [
                "http://localhost:8081",
                "http://localhost:8082",
                "http://localhost:8083"
            ]
        );
        assert_eq!(config.shutdown.grace_period_secs, 5);
    }

    #[test]
    fn rejects_malformed_backend() {
        let err = parse_config(
            r#"
            [[backends]]
            address = "not a url"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errs) if errs.len() == 1));
        assert!(err.to_string().contains("backends[0]"));
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(
            parse_config("[listener"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = resolve_config(Some(Path::new("/nonexistent/proxy.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
