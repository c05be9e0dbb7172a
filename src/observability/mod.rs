//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! proxy handler and server produce:
//!     → logging.rs (structured log events, request id on every line)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty for development, JSON for shipping)
//!     → Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
