//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the sink.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::duration::serde_str;

/// Root configuration for the sink.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SinkConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Relay behavior (target, delay, fallback status).
    pub relay: RelayConfig,

    /// Outbound HTTP client settings.
    pub client: ClientConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections.
    pub max_connections: usize,

    /// How long in-flight connections may drain on shutdown.
    #[serde(with = "serde_str")]
    pub shutdown_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Upstream URL to forward to. Empty answers locally.
    pub target: String,

    /// Log headers and request bodies.
    pub verbose: bool,

    /// Status returned when no target is set. 0 means 200.
    pub status_code: u16,

    /// Artificial delay added before responding.
    #[serde(with = "serde_str")]
    pub wait: Duration,

    /// Largest inbound body buffered for verbose logging. Bodies that are not
    /// logged are streamed to the target without a limit.
    pub max_body_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            verbose: false,
            status_code: 0,
            wait: Duration::ZERO,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Outbound client configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Total timeout for one upstream call. Zero disables it.
    #[serde(with = "serde_str")]
    pub timeout: Duration,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Optional file that receives a copy of every log line.
    pub log_file: Option<PathBuf>,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            log_file: None,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SinkConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.relay.status_code, 0);
        assert_eq!(config.relay.wait, Duration::ZERO);
        assert!(config.relay.target.is_empty());
        assert_eq!(config.client.timeout, Duration::ZERO);
        assert_eq!(config.observability.log_format, LogFormat::Text);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: SinkConfig = toml::from_str(
            r#"
            [relay]
            target = "http://localhost:9000"
            wait = "1m30s"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.relay.target, "http://localhost:9000");
        assert_eq!(config.relay.wait, Duration::from_secs(90));
        assert_eq!(config.relay.max_body_bytes, 16 * 1024 * 1024);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.listener.max_connections, 10_000);
    }

    #[test]
    fn bad_duration_is_a_parse_error() {
        let result: Result<SinkConfig, _> = toml::from_str("[relay]\nwait = \"soon\"\n");
        assert!(result.is_err());
    }
}
