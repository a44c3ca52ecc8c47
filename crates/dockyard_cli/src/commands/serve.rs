//! Serve command - Run the HTTP API until interrupted.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dockyard_api::{ApiServer, ApiState};
use dockyard_core::Orchestrator;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides the configuration file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,
}

pub async fn execute(args: ServeArgs, orchestrator: Arc<Orchestrator>) -> Result<()> {
    let server_config = orchestrator.config().server.clone();
    let host = args.host.unwrap_or(server_config.host);
    let port = args.port.unwrap_or(server_config.port);

    let server = ApiServer::start(
        ApiState::new(orchestrator),
        &host,
        port,
        &server_config.base_path,
    )
    .await
    .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    println!("🚀 Serving on {}{}", server.url(), server_config.base_path);
    println!("   Press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("Shutting down HTTP server");
    server.stop().await;
    Ok(())
}
