//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (per-request spans with request IDs)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metrics are opt-in; recording is a no-op without an installed recorder

pub mod logging;
pub mod metrics;
pub mod tracing;
