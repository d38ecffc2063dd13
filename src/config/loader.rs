//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::SinkConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a TOML file without validating it.
///
/// The CLI layers its overrides on top before validation runs.
pub fn read_config(path: &Path) -> Result<SinkConfig, LoadError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
