//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum Router with a single catch-all route
//! - Serve each accepted connection over HTTP/1.1 or h2c
//! - Log connection failures, including broken writes to the caller
//! - Drain connections on shutdown, up to a deadline

use axum::{body::Body, extract::State, http::Request, response::Response, routing::any, Router};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
    service::TowerToHyperService,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::lifecycle::ShutdownSignal;
use crate::net::{ConnectionTracker, Listener};
use crate::relay::RelayHandler;

/// HTTP front end of the sink.
pub struct SinkServer {
    router: Router,
    shutdown_timeout: Duration,
}

impl SinkServer {
    /// Create a server dispatching every request to `handler`.
    pub fn new(handler: Arc<RelayHandler>, shutdown_timeout: Duration) -> Self {
        Self {
            router: Self::build_router(handler),
            shutdown_timeout,
        }
    }

    fn build_router(handler: Arc<RelayHandler>) -> Router {
        Router::new()
            .route("/", any(relay_handler))
            .route("/{*path}", any(relay_handler))
            .with_state(handler)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Accept and serve connections until `shutdown` fires, then drain.
    pub async fn run(self, listener: Listener, mut shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_connections = listener.max_connections(),
            "HTTP server starting"
        );

        let tracker = ConnectionTracker::new();
        loop {
            let (stream, peer_addr, permit) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(connection) => connection,
                    Err(err) => {
                        tracing::warn!(error = %err, "Failed to accept connection");
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        continue;
                    }
                },
                _ = shutdown.wait() => break,
            };

            let guard = tracker.track();
            let service = TowerToHyperService::new(self.router.clone());
            tokio::spawn(async move {
                let _permit = permit;
                let io = TokioIo::new(stream);
                if let Err(err) = auto::Builder::new(TokioExecutor::new())
                    .serve_connection(io, service)
                    .await
                {
                    tracing::error!(
                        connection_id = %guard.id(),
                        peer_addr = %peer_addr,
                        error = %err,
                        "Error serving connection"
                    );
                }
                drop(guard);
            });
        }

        drop(listener);
        tracing::info!(
            active_connections = tracker.active_count(),
            "Stopped accepting, draining connections"
        );
        if tokio::time::timeout(self.shutdown_timeout, tracker.wait_for_shutdown())
            .await
            .is_err()
        {
            tracing::warn!(
                active_connections = tracker.active_count(),
                "Shutdown deadline reached, abandoning open connections"
            );
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn relay_handler(State(handler): State<Arc<RelayHandler>>, request: Request<Body>) -> Response {
    handler.handle(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::RelayOptions;
    use crate::upstream::UpstreamClient;
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    fn server(status_code: u16) -> SinkServer {
        let client = UpstreamClient::from_client(reqwest::Client::new());
        let handler = RelayHandler::new(
            tracing::Dispatch::none(),
            client,
            RelayOptions {
                status_code,
                ..RelayOptions::default()
            },
        )
        .unwrap();
        SinkServer::new(Arc::new(handler), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn every_path_and_method_reaches_the_handler() {
        let router = server(204).router();

        for (method, path) in [
            (Method::GET, "/"),
            (Method::POST, "/a"),
            (Method::DELETE, "/deeply/nested/path?x=1"),
            (Method::OPTIONS, "/trailing/"),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap();
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT, "{path}");
        }
    }
}
