//! Relay handler: answer locally or forward to the target.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → logging.rs (method + URI; verbose: headers + body, body restored)
//!     → no target:  wait → fallback status, empty body
//!     → target:     uri.rs join → upstream call → read body → wait → mirror upstream
//!                   join failure → 500 (no wait)
//!                   call failure → wait → 502
//!                   body read failure → wait → 500
//! ```
//!
//! # Design Decisions
//! - Configuration, client and logger are fixed at construction; no state is
//!   shared between requests, so the handler is used concurrently without locks
//! - The response is built as a value (response.rs) and committed once
//! - All events go to the injected logger, never to the global default

pub mod body;
pub mod error;
pub mod logging;
pub mod response;
pub mod uri;

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{header, request::Parts, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{instrument::WithSubscriber, Dispatch};

use crate::config::RelayConfig;
use crate::observability::metrics;
use crate::upstream::UpstreamClient;

pub use body::{BodyError, RequestBody, Upload};
pub use error::{ConfigError, RelayError};
pub use response::RelayResponse;
pub use uri::{join_target, request_uri, UriJoinError};

/// Headers the outbound client frames itself. A streamed body keeps the
/// inbound `content-length`.
const FRAMING_HEADERS: [header::HeaderName; 4] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::TRAILER,
];

/// Construction parameters for [`RelayHandler`].
#[derive(Debug, Clone)]
pub struct RelayOptions {
    /// Upstream URL. Blank means answer locally.
    pub target: String,
    pub verbose: bool,
    /// Fallback status. 0 selects 200.
    pub status_code: u16,
    pub wait: Duration,
    pub max_body_bytes: usize,
}

impl Default for RelayOptions {
    fn default() -> Self {
        RelayOptions::from(&RelayConfig::default())
    }
}

impl From<&RelayConfig> for RelayOptions {
    fn from(config: &RelayConfig) -> Self {
        Self {
            target: config.target.clone(),
            verbose: config.verbose,
            status_code: config.status_code,
            wait: config.wait,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// Answers or relays every inbound request.
#[derive(Debug)]
pub struct RelayHandler {
    logger: Dispatch,
    client: UpstreamClient,
    target: Option<String>,
    verbose: bool,
    fallback_status: StatusCode,
    wait: Duration,
    max_body_bytes: usize,
}

impl RelayHandler {
    /// Validate options and build the handler.
    ///
    /// The target is trimmed; blank disables forwarding. The status code must
    /// be 0 (meaning 200) or within 100-999.
    pub fn new(
        logger: Dispatch,
        client: UpstreamClient,
        options: RelayOptions,
    ) -> Result<Self, ConfigError> {
        let target = options.target.trim();
        let target = (!target.is_empty()).then(|| target.to_string());

        let fallback_status = match options.status_code {
            0 => StatusCode::OK,
            code if (100..=999).contains(&code) => {
                StatusCode::from_u16(code).map_err(|_| ConfigError::InvalidStatusCode(code))?
            }
            code => return Err(ConfigError::InvalidStatusCode(code)),
        };

        if let Some(target) = &target {
            tracing::dispatcher::with_default(&logger, || {
                tracing::debug!(target = %target, "Forwarding requests to target");
            });
        }

        Ok(Self {
            logger,
            client,
            target,
            verbose: options.verbose,
            fallback_status,
            wait: options.wait,
            max_body_bytes: options.max_body_bytes,
        })
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn fallback_status(&self) -> StatusCode {
        self.fallback_status
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Handle one inbound request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();

        let response = self
            .dispatch(request)
            .with_subscriber(self.logger.clone())
            .await;

        metrics::record_request(method.as_str(), response.status().as_u16(), start);
        response.into_response()
    }

    async fn dispatch(&self, request: Request<Body>) -> RelayResponse {
        let (parts, body) = request.into_parts();
        let mut body = RequestBody::new(body, self.max_body_bytes);
        logging::log_request_details(&parts, &mut body, self.verbose).await;

        let Some(target) = self.target.as_deref() else {
            tokio::time::sleep(self.wait).await;
            return RelayResponse::new(self.fallback_status);
        };

        match self.relay(target, &parts, body).await {
            Ok(response) => {
                tokio::time::sleep(self.wait).await;
                response
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    target = %target,
                    path = %parts.uri.path(),
                    "{}",
                    err.log_message()
                );
                if err.applies_wait() {
                    tokio::time::sleep(self.wait).await;
                }
                RelayResponse::diagnostic(err.status(), err.message())
            }
        }
    }

    /// Reissue the request against the target and collect the full response.
    ///
    /// A body that verbose logging did not buffer is streamed to the target
    /// as it arrives. The upstream connection is released when the response is dropped, on
    /// every path out of this function.
    async fn relay(
        &self,
        target: &str,
        parts: &Parts,
        body: RequestBody,
    ) -> Result<RelayResponse, RelayError> {
        let destination = join_target(target, request_uri(&parts.uri))?;

        let mut headers = forwarded_headers(&parts.headers);
        let body = match body.into_upload()? {
            Upload::Buffered(bytes) => reqwest::Body::from(bytes),
            Upload::Streaming(body) => {
                if let Some(length) = parts.headers.get(header::CONTENT_LENGTH) {
                    headers.insert(header::CONTENT_LENGTH, length.clone());
                }
                reqwest::Body::wrap_stream(body.into_data_stream())
            }
        };

        let request = self
            .client
            .request(parts.method.clone(), destination)
            .headers(headers)
            .body(body)
            .build()
            .map_err(RelayError::UpstreamCall)?;

        let upstream = self
            .client
            .execute(request)
            .await
            .map_err(RelayError::UpstreamCall)?;

        let response = RelayResponse::new(upstream.status()).with_upstream_headers(upstream.headers());
        let body = upstream.bytes().await.map_err(RelayError::ResponseRead)?;
        Ok(response.with_body(body))
    }
}

/// Inbound headers minus the ones the client recomputes.
fn forwarded_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if FRAMING_HEADERS.contains(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}
