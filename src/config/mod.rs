//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI flags / env override individual fields
//!     → validation.rs (semantic checks)
//!     → SinkConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A malformed target is not rejected here; it fails per request

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{read_config, LoadError};
pub use schema::{ClientConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, SinkConfig};
pub use validation::{validate_config, ValidationError};
