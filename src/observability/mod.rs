//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Decorators produce:
//!     → tracing events (rejections, trips, recoveries, cache hits)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
