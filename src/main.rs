//! Edge Cache - in-memory cache tier of an edge proxy node
//!
//! Runs the memory store with background expiration sweeps and exposes the
//! admin HTTP API.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edge_cache::api::{create_router, AppState};
use edge_cache::{Config, GcManager};

/// Main entry point for the edge cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the memory store
/// 4. Register the store's expiration list with the shared GC manager
/// 5. Start the HTTP server with graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edge_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Edge Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}B, max_item_size={}B, default_ttl={}s, gc_interval={}s, port={}",
        config.memory_capacity_bytes,
        config.max_item_size,
        config.default_ttl,
        config.gc_interval,
        config.server_port
    );

    let state = AppState::from_config(&config);
    info!("Memory store initialized");

    let gc = GcManager::init_shared(Duration::from_secs(config.gc_interval));
    gc.add(state.store.expires_list())
        .context("failed to register expiration list")?;

    // Only runs when a parent tier is configured
    let flush_handle = state.store.spawn_flush_task();

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    gc.shutdown();
    if let Some(handle) = flush_handle {
        handle.abort();
    }
    warn!("Expiration sweeps stopped");

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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
}
