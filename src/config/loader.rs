//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
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

/// Environment variables naming the backend, in order of precedence.
pub const BACKEND_URL_VARS: [&str; 2] = ["BACKEND_URL", "NEXT_PUBLIC_API_URL"];

/// Environment variable overriding the listener bind address.
pub const LISTEN_ADDR_VAR: &str = "LISTEN_ADDR";

/// Parse a configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read and parse a TOML file. Validation happens after environment
/// overrides are applied.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    parse_config(&fs::read_to_string(path)?)
}

/// Apply environment overrides on top of file or default values.
///
/// `lookup` is usually `|k| std::env::var(k).ok()`; empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = BACKEND_URL_VARS.iter().find_map(|key| non_empty(*key)) {
        config.backend.base_url = url;
    }
    if let Some(addr) = non_empty(LISTEN_ADDR_VAR) {
        config.listener.bind_address = addr;
    }
}
