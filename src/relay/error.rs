//! Relay error taxonomy.

use axum::http::StatusCode;

use crate::relay::body::BodyError;
use crate::relay::uri::UriJoinError;

/// Handler construction failure. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid status code: {0}")]
    InvalidStatusCode(u16),
}

/// A failed relay attempt. Each variant maps to one client-visible outcome.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("could not build destination URL: {0}")]
    UriJoin(#[from] UriJoinError),
    #[error(transparent)]
    RequestBody(#[from] BodyError),
    #[error("upstream call failed: {0}")]
    UpstreamCall(#[source] reqwest::Error),
    #[error("failed to read upstream response body: {0}")]
    ResponseRead(#[source] reqwest::Error),
}

impl RelayError {
    /// Status returned to the inbound caller.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::UriJoin(_) | RelayError::ResponseRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::RequestBody(_) | RelayError::UpstreamCall(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Diagnostic message for the response body.
    pub fn message(&self) -> &'static str {
        match self {
            RelayError::UriJoin(_) => "Could not build URL for the target",
            RelayError::RequestBody(_) | RelayError::UpstreamCall(_) => {
                "Could not forward request to the target"
            }
            RelayError::ResponseRead(_) => "Could not read the response body from the target",
        }
    }

    /// Log message for the failing step.
    pub fn log_message(&self) -> &'static str {
        match self {
            RelayError::UriJoin(_) => "Error joining paths",
            RelayError::RequestBody(_) | RelayError::UpstreamCall(_) => "Error forwarding request",
            RelayError::ResponseRead(_) => "Error reading response body",
        }
    }

    /// Whether the artificial delay applies before answering.
    ///
    /// Only a join failure skips it: no upstream was ever contacted.
    pub fn applies_wait(&self) -> bool {
        !matches!(self, RelayError::UriJoin(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_failure_is_local() {
        let err = RelayError::from(UriJoinError::NotABase("mailto:x".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Could not build URL for the target");
        assert!(!err.applies_wait());
    }

    #[test]
    fn lost_body_counts_as_forwarding_failure() {
        let err = RelayError::from(BodyError::Lost);
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.log_message(), "Error forwarding request");
        assert!(err.applies_wait());
    }
}
