// ABOUTME: HTTP server for the heart-rate zone distribution report
// ABOUTME: Starts the background refresh worker, warms the cache, then serves until signalled
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Zone Distribution Server Binary
//!
//! Reads configuration from the environment. Without `DATABASE_URL` the server runs
//! on an empty in-memory database and skips warm-up.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use zone_distribution::{
    cache::factory::Cache,
    cache::CacheProvider,
    config::{database::DatabaseUrl, environment::ServerConfig},
    database::Database,
    lifecycle::{warm_up, RuntimeContext, WarmupOutcome, WarmupPolicy},
    logging,
    resources::ServerResources,
    routes,
};

#[derive(Parser)]
#[command(name = "zone-distribution-server")]
#[command(about = "Heart-rate zone distribution reporting server")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override `DATABASE_URL`
    #[arg(long)]
    database_url: Option<String>,

    /// Skip the startup cache warm-up
    #[arg(long)]
    skip_warmup: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = Some(DatabaseUrl::parse_url(url));
    }
    if args.skip_warmup {
        config.distribution.warmup_enabled = false;
    }
    config.distribution.validate()?;

    logging::init_from_env()?;

    info!("Starting Zone Distribution Server");
    info!("{}", config.summary());

    let database_url = config.database.url.clone().unwrap_or_else(|| {
        warn!("DATABASE_URL not set, using an empty in-memory database");
        DatabaseUrl::Memory
    });
    let database = Database::new(&database_url, config.database.max_connections).await?;

    let cache = Cache::new(config.cache.clone()).await?;
    info!("Cache backend: {}", cache.backend_name());

    let policy = WarmupPolicy::from_config(RuntimeContext::Server, &config);
    let http_port = config.http_port;

    let (resources, worker) = ServerResources::new(database, cache, config);
    let worker_handle = worker.spawn();

    match warm_up(&resources.distribution, &policy).await {
        WarmupOutcome::Warmed(result) => info!("Serving from a warm cache: {result}"),
        WarmupOutcome::Skipped(reason) => {
            info!("Serving from a cold cache ({reason}); the first read schedules a refresh");
        }
        WarmupOutcome::Failed(_) => {
            warn!("Serving from a cold cache after warm-up failure; the first read schedules a refresh");
        }
    }

    let app = routes::router(Arc::new(resources));
    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Listening on http://{addr}");
    info!("   Distribution:   GET  http://{addr}/api/zone-distribution");
    info!("   Refresh:        POST http://{addr}/api/zone-distribution/refresh");
    info!("   Async Refresh:  POST http://{addr}/api/zone-distribution/refresh/async");
    info!("   Sessions:       GET  http://{addr}/api/sessions");
    info!("   Health:         GET  http://{addr}/health");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    worker_handle.abort();
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        () = terminate => warn!("Received terminate signal, shutting down"),
    }
}
