//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay / server / client produce:
//!     → logging.rs (structured log events: stdout, optional file)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log files and stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Text format for terminals, JSON for machine parsing
//! - The relay handler receives its logger explicitly; the global
//!   subscriber is only the default that `main` hands it
//! - Metrics are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
