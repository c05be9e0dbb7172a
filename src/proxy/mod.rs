//! Forwarding proxy subsystem.
//!
//! # Data Flow
//! ```text
//! axum route (one per RouteConfig)
//!     → handler.rs (gates, validation, outbound construction)
//!     → forwarder.rs (single reqwest call to the backend)
//!     → rules.rs (response-transform rules)
//!     → JSON response, or error.rs rendering of the rejection
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing is cached or shared between requests except the client
//! - Domain payloads are never inspected beyond declared presence checks
//! - Inbound body bytes are forwarded unchanged

pub mod auth;
pub mod error;
pub mod forwarder;
pub mod handler;
pub mod rules;

pub use error::ProxyError;
pub use forwarder::{BackendReply, ForwardError, ForwardedRequest, Forwarder};
pub use handler::handle;
