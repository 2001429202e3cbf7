//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Enrollment service, transaction client, HTTP facade produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the HTTP layer into call spans
//! - Private keys, secrets and tokens never appear in events

pub mod logging;
pub mod metrics;
