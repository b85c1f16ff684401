//! Edge Orchestrator - speculative reads with asynchronous consistency verification
//!
//! Serves the index page from a local cache and reconciles it with a remote
//! authority on every request.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edge_orchestrator::api::create_router;
use edge_orchestrator::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the orchestrator.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing (`DEBUGPRINT` picks the default level, `RUST_LOG` overrides)
/// 3. Build the local cache, the authority client and the reconciliation engine
/// 4. Start background TTL cleanup task
/// 5. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting edge orchestrator");
    info!(
        max_entries = config.max_entries,
        cache_ttl = config.cache_ttl,
        port = config.server_port,
        consistency_check = config.protocol.do_consistency_check,
        remote_url = %config.protocol.remote_url,
        function = %config.protocol.backup,
        miss_threshold = config.protocol.miss_threshold(),
        "Configuration loaded"
    );

    let state = AppState::from_config(&config).context("failed to build application state")?;
    info!("Cache and consistency oracle initialized");

    let cleanup_handle = spawn_cleanup_task(state.cache.store(), config.cleanup_interval);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the cleanup task.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
