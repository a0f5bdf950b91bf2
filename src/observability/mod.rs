//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (human or JSON lines)
//!     → optional Prometheus scrape endpoint
//! ```
//!
//! Request IDs (`x-request-id`) are attached by the HTTP layer and show up
//! on the request spans.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
