//! Configuration validation.
//!
//! Semantic checks only; serde handles the syntax. All errors are collected
//! so an operator sees every problem in one run.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("backend.base_url {0:?} is not a valid URL")]
    InvalidBackendUrl(String),
    #[error("backend.base_url must use http or https, got {0:?}")]
    UnsupportedScheme(String),
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.backend.base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidBackendUrl(
            config.backend.base_url.clone(),
        )),
    }

    if config.backend.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("backend.timeout_secs"));
    }
    if config.backend.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("backend.connect_timeout_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroValue("security.max_body_size"));
    }

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&ProxyConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = ProxyConfig::default();
        config.backend.base_url = "not a url".into();
        config.backend.timeout_secs = 0;
        config.listener.bind_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroValue("backend.timeout_secs")));
    }

    #[test]
    fn rejects_non_http_backend() {
        let mut config = ProxyConfig::default();
        config.backend.base_url = "ftp://files.example".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::UnsupportedScheme("ftp".into())])
        );
    }

    #[test]
    fn metrics_address_ignored_when_disabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());
    }
}
