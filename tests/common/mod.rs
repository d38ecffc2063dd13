//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use devnull::config::ListenerConfig;
use devnull::net::Listener;
use devnull::{RelayHandler, RelayOptions, Shutdown, SinkServer, UpstreamClient};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

pub const TEAPOT_BODY: &str = "this is a test response";

/// A sink running on an ephemeral loopback port. Stops when dropped.
pub struct RunningSink {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningSink {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningSink {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a sink with the given relay options.
pub async fn start_sink(options: RelayOptions) -> RunningSink {
    let upstream = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let handler = RelayHandler::new(
        tracing::Dispatch::none(),
        UpstreamClient::from_client(upstream),
        options,
    )
    .unwrap();

    let listener = Listener::bind(&ListenerConfig {
        bind_address: "127.0.0.1:0".into(),
        ..ListenerConfig::default()
    })
    .await
    .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = SinkServer::new(Arc::new(handler), Duration::from_millis(100));
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    RunningSink { addr, shutdown }
}

/// Client for talking to the sink.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Backend that always answers 418 with a fixed header, two cookies and a body.
pub async fn start_teapot_backend() -> SocketAddr {
    serve(Router::new().fallback(|| async {
        let mut headers = HeaderMap::new();
        headers.insert("target-header-1", HeaderValue::from_static("test-1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
        (StatusCode::IM_A_TEAPOT, headers, TEAPOT_BODY)
    }))
    .await
}

/// Backend that returns the request body and describes the request in headers.
pub async fn start_echo_backend() -> SocketAddr {
    serve(Router::new().fallback(|request: Request| async move {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();

        let mut response = Response::new(Body::from(body));
        let headers = response.headers_mut();
        headers.insert("x-echo-method", parts.method.as_str().parse().unwrap());
        headers.insert("x-echo-uri", parts.uri.to_string().parse().unwrap());
        if let Some(host) = parts.headers.get(header::HOST) {
            headers.insert("x-echo-host", host.clone());
        }
        for value in parts.headers.get_all("x-custom") {
            headers.append("x-echo-custom", value.clone());
        }
        response.into_response()
    }))
    .await
}

/// Raw TCP backend writing whatever `f` returns, then closing.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = String> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let raw = f().await;
                let _ = socket.write_all(raw.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

/// A loopback address nothing listens on.
pub fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
