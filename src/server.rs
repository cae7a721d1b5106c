//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared, read-only state holding the
//! upstream base URL, device identifier and HTTP client), [`build_router`]
//! for composing the forwarder with the request logging layer,
//! [`build_http_client`] for the hyper client, and [`shutdown_signal`]
//! for SIGTERM / Ctrl+C handling.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::identity::DeviceId;
use crate::middleware::request_logging;
use crate::proxy;

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

/// Process-wide state, fixed before the listener starts.
pub struct AppState {
    pub upstream: String,
    pub device_id: DeviceId,
    pub http_client: HttpClient,
}

impl AppState {
    #[must_use]
    pub fn new(upstream: impl Into<String>, device_id: DeviceId) -> Self {
        Self {
            upstream: upstream.into(),
            device_id,
            http_client: build_http_client(),
        }
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring` as the default.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

/// Every method on every path goes to the forwarder, wrapped in request logging.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(proxy::forward_handler)
        .layer(request_logging())
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
