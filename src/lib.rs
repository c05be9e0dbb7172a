//! Laserkongen storefront API proxy.
//!
//! Relays the browser client's `/api/...` calls to the backend service
//! through one generic handler driven by a declarative route table.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
