//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper connection, Axum catch-all route)
//!     → relay::RelayHandler (answer locally or forward)
//!     → Send to client
//! ```

pub mod server;

pub use server::SinkServer;
