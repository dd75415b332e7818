//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Upstream credential variable.
pub const ENV_API_KEY: &str = "AI_API_KEY";
/// Upstream endpoint variable.
pub const ENV_API_URL: &str = "AI_API_URL";
/// Listener port variable.
pub const ENV_PORT: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides from the process environment, and validate.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    load_config_with(path, |var| std::env::var(var).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay `AI_API_KEY`, `AI_API_URL` and `PORT` on top of `config`.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

    if let Some(key) = get(ENV_API_KEY) {
        config.upstream.api_key = Some(key);
    }
    if let Some(url) = get(ENV_API_URL) {
        config.upstream.api_url = Some(url);
    }
    if let Some(port) = get(ENV_PORT) {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_PORT,
            value: port.clone(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = load_config_with(None, env(&[])).unwrap();
        assert_eq!(config, ProxyConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = load_config_with(
            None,
            env(&[
                (ENV_API_KEY, "sk-test"),
                (ENV_API_URL, "https://api.example.com/generate"),
                (ENV_PORT, "9000"),
            ]),
        )
        .unwrap();

        assert_eq!(config.upstream.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            config.upstream.api_url.as_deref(),
            Some("https://api.example.com/generate")
        );
        assert_eq!(config.listener.port, 9000);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let config = load_config_with(None, env(&[(ENV_API_KEY, ""), (ENV_PORT, "")])).unwrap();
        assert!(config.upstream.api_key.is_none());
        assert_eq!(config.listener.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let err = load_config_with(None, env(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_PORT, .. }));
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn test_env_beats_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            port = 7000

            [upstream]
            api_key = "from-file"
            api_url = "https://file.example.com/generate"
            "#
        )
        .unwrap();

        let config =
            load_config_with(Some(file.path()), env(&[(ENV_API_KEY, "from-env")])).unwrap();

        assert_eq!(config.upstream.api_key.as_deref(), Some("from-env"));
        assert_eq!(
            config.upstream.api_url.as_deref(),
            Some("https://file.example.com/generate")
        );
        assert_eq!(config.listener.port, 7000);
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nport = ").unwrap();
        let err = load_config_with(Some(file.path()), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config_with(Some(Path::new("/nonexistent/proxy.toml")), env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_runs_after_overrides() {
        let err = load_config_with(None, env(&[(ENV_API_URL, "not a url")])).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(matches!(errors[0], ValidationError::InvalidUpstreamUrl(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
