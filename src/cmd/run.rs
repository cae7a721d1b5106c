//! `chain-proxy run`: start the proxy server.
//!
//! Loads the configuration, resolves the device identifier, then serves
//! the forwarder until Ctrl+C / SIGTERM. Any failure before the listener
//! is bound is returned to `main`, which exits the process.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config;
use crate::error::ChainProxyError;
use crate::identity;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), ChainProxyError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let config = config::load(&args.config).await?;

    let device_id = identity::resolve(
        args.identity.device_id.as_deref(),
        &args.identity.device_id_file,
    )
    .await?;

    let host = args.host.as_deref().unwrap_or(&config.server.host);

    let upstream = config.runner.server_url.clone();
    let state = Arc::new(AppState::new(upstream.clone(), device_id.clone()));
    let router = server::build_router(state);

    let listener = tokio::net::TcpListener::bind((host, args.port)).await?;
    let addr = listener.local_addr()?;

    tracing::info!(
        addr = %addr,
        upstream = %upstream,
        device_id = %device_id,
        "chain proxy started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("chain proxy stopped");
    Ok(())
}
