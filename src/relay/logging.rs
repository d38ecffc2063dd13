//! Per-request log entry.

use axum::http::{header, request::Parts, HeaderMap, Method};

use crate::relay::body::RequestBody;
use crate::relay::uri::request_uri;

/// Log the inbound request.
///
/// Plain mode records method and URI. Verbose mode adds the headers and, for
/// body-bearing requests, the body, which stays readable for forwarding.
/// A body read failure is logged and never aborts the request.
pub async fn log_request_details(parts: &Parts, body: &mut RequestBody, verbose: bool) {
    let method = &parts.method;
    let uri = request_uri(&parts.uri);

    if !verbose {
        tracing::info!(method = %method, uri = %uri, "Request received");
        return;
    }

    let headers = format_headers(&parts.headers);
    if !carries_body(parts) {
        tracing::info!(method = %method, uri = %uri, headers = %headers, "Request received");
        return;
    }

    match body.materialize().await {
        Ok(bytes) => {
            tracing::info!(
                method = %method,
                uri = %uri,
                headers = %headers,
                body = %String::from_utf8_lossy(&bytes),
                "Request received"
            );
        }
        Err(err) => {
            tracing::error!(error = %err, method = %method, uri = %uri, "Error reading request body");
            tracing::info!(method = %method, uri = %uri, headers = %headers, "Request received");
        }
    }
}

/// `Name: v1, v2` per header, sorted by name, joined with `, `.
pub fn format_headers(headers: &HeaderMap) -> String {
    let mut names: Vec<_> = headers.keys().collect();
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    names
        .into_iter()
        .map(|name| {
            let values = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {}", name, values)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn carries_body(parts: &Parts) -> bool {
    if matches!(parts.method, Method::POST | Method::PUT | Method::PATCH) {
        return true;
    }
    parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .is_some_and(|len| len > 0)
}
