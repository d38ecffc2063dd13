//! devnull: a configurable HTTP sink.
//!
//! Every request is logged, then either answered locally with a fixed status
//! after an optional delay, or relayed verbatim to a target with the
//! target's response copied back. Used to test HTTP clients against slow,
//! failing or fixed-status endpoints.

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod relay;
pub mod upstream;

pub use config::SinkConfig;
pub use http::SinkServer;
pub use lifecycle::Shutdown;
pub use relay::{RelayHandler, RelayOptions};
pub use upstream::UpstreamClient;
