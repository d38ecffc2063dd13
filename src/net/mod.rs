//! Network layer.
//!
//! # Data Flow
//! ```text
//! bind address
//!     → listener.rs (bind, accept with connection-limit permit)
//!     → connection.rs (ID + live-connection guard)
//!     → http::server (serves the connection)
//! ```

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{ConnectionPermit, Listener, ListenerError};
