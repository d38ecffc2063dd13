//! Response assembled in memory and committed in one step.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Serialize)]
struct Diagnostic<'a> {
    message: &'a str,
}

/// Status, headers and body of the response to the inbound caller.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RelayResponse {
    /// Empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Error response with a `{"message": ...}` JSON body.
    pub fn diagnostic(status: StatusCode, message: &str) -> Self {
        let body = serde_json::to_vec(&Diagnostic { message }).unwrap_or_default();
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            status,
            headers,
            body: Bytes::from(body),
        }
    }

    /// Append every upstream header, keeping repeated names.
    ///
    /// `transfer-encoding` is skipped: the relayed body is fully buffered and
    /// the server frames it again.
    pub fn with_upstream_headers(mut self, upstream: &HeaderMap) -> Self {
        for (name, value) in upstream {
            if *name == header::TRANSFER_ENCODING {
                continue;
            }
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
