//! # HTTP Server
//!
//! One record endpoint plus a health check:
//!
//! - `POST /` and `POST /exec`: request envelope in, response envelope out
//! - `GET /health`
//!
//! The record endpoint always answers `200 OK` with a JSON body; failures
//! are reported through `success: false`, never through the status code.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use super::config::HttpServerConfig;
use crate::api::{ApiError, ApiHandler, Response};
use crate::observability::{log_event, Event};
use crate::storage::SheetStore;

/// Handler shared by all connections. The mutex is the single
/// serialization point for the check-then-write sequence of create and
/// update.
pub type SharedHandler<S> = Arc<Mutex<ApiHandler<S>>>;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// HTTP server for the record endpoint
pub struct HttpServer<S: SheetStore + Send + 'static> {
    config: HttpServerConfig,
    handler: SharedHandler<S>,
}

impl<S: SheetStore + Send + 'static> HttpServer<S> {
    /// Create a server around `handler`
    pub fn new(handler: ApiHandler<S>, config: HttpServerConfig) -> Self {
        Self {
            config,
            handler: Arc::new(Mutex::new(handler)),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Build the router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", post(exec_handler::<S>))
            .route("/exec", post(exec_handler::<S>))
            .route("/health", get(health_handler))
            .layer(DefaultBodyLimit::disable())
            .layer(cors_layer(&self.config))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.handler))
    }

    /// Bind and serve until ctrl-c
    pub async fn start(self) -> std::io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        log_event(Event::ServerListening, &[("addr", addr.to_string().as_str())]);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete, &[]);
        Ok(())
    }
}

fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

/// Record endpoint. Runs the synchronous handler on the blocking pool.
///
/// The body is taken as raw bytes so that undecodable input still gets a
/// JSON failure envelope. A poisoned lock is recovered: every storage
/// mutation is applied whole or not at all.
async fn exec_handler<S: SheetStore + Send + 'static>(
    State(handler): State<SharedHandler<S>>,
    body: Bytes,
) -> impl IntoResponse {
    let outcome = tokio::task::spawn_blocking(move || {
        let body = match std::str::from_utf8(&body) {
            Ok(body) => body,
            Err(e) => {
                let err = ApiError::invalid_request(format!("body is not UTF-8: {}", e));
                warn!(code = err.code(), error = %err, "request failed");
                return Response::failure(err.to_string());
            }
        };
        let mut guard = handler.lock().unwrap_or_else(PoisonError::into_inner);
        guard.handle(body)
    })
    .await;

    let response = outcome.unwrap_or_else(|e| {
        error!(error = %e, "request task failed");
        Response::failure(e.to_string())
    });

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        response.to_json(),
    )
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ServiceConfig;
    use crate::storage::MemorySheet;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use std::num::NonZeroUsize;
    use tower::ServiceExt;

    fn server(port: u16) -> HttpServer<MemorySheet> {
        let handler = ApiHandler::new(
            MemorySheet::with_header(&["Name", "Email"]),
            ServiceConfig::new(NonZeroUsize::new(2).unwrap()),
        );
        HttpServer::new(handler, HttpServerConfig::with_port(port))
    }

    #[test]
    fn test_server_with_custom_port() {
        assert_eq!(server(8080).socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds() {
        let _router = server(8787).router();
    }

    #[test]
    fn test_restricted_cors_builds() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _layer = cors_layer(&config);
    }

    #[tokio::test]
    async fn test_recovers_from_poisoned_lock() {
        let server = server(8787);
        let shared = Arc::clone(&server.handler);
        let poisoned = std::thread::spawn(move || {
            let _guard = shared.lock().unwrap();
            panic!("handler panicked while locked");
        })
        .join();
        assert!(poisoned.is_err());
        assert!(server.handler.is_poisoned());

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"action":"read"}"#))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
    }
}
