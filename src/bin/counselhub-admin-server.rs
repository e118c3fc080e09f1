// ABOUTME: Admin API server binary
// ABOUTME: Loads configuration, opens the database and serves the admin routes until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Counselhub Admin Server Binary

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use counselhub_admin::{
    cache::InMemoryViewCache,
    config::{DatabaseUrl, ServerConfig},
    database_plugins::SqliteDatabase,
    identity::FirebaseIdentityResolver,
    logging,
    routes::{build_router, AdminApiContext},
};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "counselhub-admin-server")]
#[command(about = "Counselhub admin API - provider vetting and payout approval")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }
    info!("{}", config.summary());

    let database = SqliteDatabase::connect(&config.database.url).await?;
    if config.database.auto_migrate {
        database.migrate().await?;
        info!("Database migrations applied");
    } else {
        warn!("Automatic migrations disabled - schema must already exist");
    }

    let identity = Arc::new(FirebaseIdentityResolver::new(config.firebase.clone())?);
    let view_cache = Arc::new(InMemoryViewCache::new(&config.view_cache)?);
    let context = AdminApiContext::new(Arc::new(database), identity, view_cache);
    let app = build_router(context, config.request_timeout());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Admin API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
