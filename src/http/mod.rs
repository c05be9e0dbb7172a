//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one route per table entry)
//!     → request.rs (request id assigned and propagated)
//!     → proxy::handle (gates, forward, relay)
//!     → response.rs (locally generated JSON answers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
