//! Instrumented HTTP client for upstream calls.

use std::time::Instant;

use reqwest::{Method, Request, RequestBuilder, Response};
use url::Url;

use crate::config::ClientConfig;
use crate::observability::metrics::{self, InFlightGuard};

/// Outbound client shared by all requests.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    inner: reqwest::Client,
}

impl UpstreamClient {
    /// Build a client from configuration. A zero timeout means none.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if !config.timeout.is_zero() {
            builder = builder.timeout(config.timeout);
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// Wrap an already configured `reqwest` client.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Start building a request to `url`.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Send a request, recording in-flight, count and latency metrics.
    pub async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        let method = request.method().to_string();
        let _in_flight = InFlightGuard::acquire();
        let start = Instant::now();

        let result = self.inner.execute(request).await;

        let code = match &result {
            Ok(response) => response.status().as_u16().to_string(),
            Err(_) => "error".to_string(),
        };
        metrics::record_client_request(&method, &code, start);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builds_with_and_without_timeout() {
        assert!(UpstreamClient::new(&ClientConfig::default()).is_ok());
        assert!(UpstreamClient::new(&ClientConfig {
            timeout: Duration::from_secs(5)
        })
        .is_ok());
    }

    #[tokio::test]
    async fn connection_refused_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = UpstreamClient::from_client(reqwest::Client::builder().no_proxy().build().unwrap());
        let url = Url::parse(&format!("http://{}/", addr)).unwrap();
        let request = client.request(Method::GET, url).build().unwrap();

        assert!(client.execute(request).await.is_err());
    }
}
