//! Binary crate for the OOTD recommendation server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Loading configuration and wiring the service clients
//! - Serving the HTTP API

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ootd_server::{routes, state::AppState};

/// Weather-driven outfit recommendation API.
#[derive(Debug, Parser)]
#[command(name = "ootd-server", version, about = "OOTD recommendation server")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Optional TOML config file; environment variables are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config =
        ootd_core::Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let state =
        Arc::new(AppState::from_config(&config).context("Failed to build service clients")?);

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    info!(addr = %args.bind, "listening");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
