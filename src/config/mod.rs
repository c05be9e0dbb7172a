//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (BACKEND_URL, NEXT_PUBLIC_API_URL, LISTEN_ADDR)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to HttpServer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so the proxy runs with no file at all
//! - Environment is read once in `main`, never from request handlers

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, parse_config, ConfigError};
pub use schema::{
    BackendConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, SecurityConfig,
};
pub use validation::{validate_config, ValidationError};
