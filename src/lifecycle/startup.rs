//! Startup orchestration.
//!
//! Builds the effective configuration in a fixed order: `.env` file, TOML
//! file (optional), environment overrides, validation. Any error is fatal.

use std::path::Path;

use crate::config::{
    apply_env_overrides, load_config, validate_config, ConfigError, ProxyConfig,
};

/// Resolve the configuration the process will run with.
pub fn resolve_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();

    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
