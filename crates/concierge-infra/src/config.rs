//! Configuration loader for the concierge relay.
//!
//! Reads `concierge.toml` and deserializes it into [`ConciergeConfig`]. The
//! binary falls back to defaults when the file is missing or malformed, so
//! the server can always start with nothing but an API key in the environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use concierge_types::config::{ConciergeConfig, ModelConfig};

/// Config file consulted when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "concierge.toml";

/// Errors from reading an explicit configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read and parse the configuration file.
///
/// `path` defaults to [`DEFAULT_CONFIG_FILE`] in the working directory.
/// Returns `Ok(None)` when the file does not exist.
pub async fn read_config(path: Option<&Path>) -> Result<Option<ConciergeConfig>, ConfigError> {
    let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str::<ConciergeConfig>(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
}

/// Read the API key from the environment variable named by
/// `config.api_key_env`.
pub fn resolve_api_key(config: &ModelConfig) -> Option<SecretString> {
    resolve_api_key_with(config, |name| std::env::var(name).ok())
}

/// Same as [`resolve_api_key`] with an injectable lookup. Blank values count
/// as missing.
pub fn resolve_api_key_with<F>(config: &ModelConfig, lookup: F) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&config.api_key_env)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}
