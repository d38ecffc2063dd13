//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! reported, not just the first one.

use std::net::SocketAddr;

use crate::config::schema::SinkConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid status code: {0} (expected 0 or 100-999)")]
    InvalidStatusCode(u16),
    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),
    #[error("invalid metrics address: {0}")]
    InvalidMetricsAddress(String),
    #[error("max_connections must be greater than zero")]
    ZeroMaxConnections,
    #[error("max_body_bytes must be greater than zero")]
    ZeroMaxBodyBytes,
}

/// Whether `code` is acceptable as a fallback status (0 selects the default).
pub fn is_valid_status_code(code: u16) -> bool {
    code == 0 || (100..=999).contains(&code)
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &SinkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_valid_status_code(config.relay.status_code) {
        errors.push(ValidationError::InvalidStatusCode(config.relay.status_code));
    }
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }
    if config.relay.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroMaxBodyBytes);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SinkConfig::default()).is_ok());
    }

    #[test]
    fn status_code_range() {
        assert!(is_valid_status_code(0));
        assert!(is_valid_status_code(100));
        assert!(is_valid_status_code(418));
        assert!(is_valid_status_code(999));
        assert!(!is_valid_status_code(1));
        assert!(!is_valid_status_code(99));
        assert!(!is_valid_status_code(1000));
    }

    #[test]
    fn collects_every_error() {
        let mut config = SinkConfig::default();
        config.relay.status_code = 42;
        config.listener.bind_address = "nowhere".into();
        config.listener.max_connections = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "also nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidStatusCode(42),
                ValidationError::InvalidBindAddress("nowhere".into()),
                ValidationError::InvalidMetricsAddress("also nowhere".into()),
                ValidationError::ZeroMaxConnections,
            ]
        );
    }

    #[test]
    fn malformed_target_is_not_a_startup_error() {
        let mut config = SinkConfig::default();
        config.relay.target = "::not a url::".into();
        assert!(validate_config(&config).is_ok());
    }
}
