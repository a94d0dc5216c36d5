//! Shard Cache - node and routing proxy server
//!
//! `ROLE=node` serves a local TTL store; `ROLE=proxy` shards requests
//! across the nodes listed in `NODES`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shard_cache::api::{create_proxy_router, create_router};
use shard_cache::router::HttpConnector;
use shard_cache::{spawn_cleanup_task, CacheService, Config, ProxyState, Role, Router};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the node service (plus sweep task) or the router
/// 4. Start HTTP server on configured port
/// 5. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shard_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: role={:?}, port={}, default_ttl={}s, cleanup_interval={}s, replicas={}, nodes={:?}",
        config.role,
        config.server_port,
        config.default_ttl,
        config.cleanup_interval,
        config.replicas,
        config.nodes
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    match config.role {
        Role::Node => run_node(&config, listener).await?,
        Role::Proxy => run_proxy(&config, listener).await?,
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn run_node(config: &Config, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let service = CacheService::from_config(config);
    let cleanup_handle = spawn_cleanup_task(service.clone(), config.cleanup_interval());
    info!("Cache node listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(service))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            cleanup_handle.abort();
            warn!("Cleanup task aborted");
        })
        .await
        .context("node server failed")
}

async fn run_proxy(config: &Config, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    if config.nodes.is_empty() {
        warn!("No NODES configured; requests fail until nodes are added via POST /nodes");
    }

    let connector = Arc::new(HttpConnector::new(config.connect_timeout()));
    let state = ProxyState::new(Router::from_config(config, connector));
    let router = state.router.clone();
    info!("Routing proxy listening on http://{}", listener.local_addr()?);

    let served = axum::serve(listener, create_proxy_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    router.close();
    info!("Closed pooled node connections");
    served.context("proxy server failed")
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
