//! api-proxy
//!
//! Forwards every inbound request to the next upstream endpoint with a free
//! concurrency slot, and optionally converts the text of JSON responses.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                    API PROXY                     │
//!                      │                                                  │
//!   Client Request     │  ┌─────────┐    ┌────────────┐    ┌───────────┐  │
//!   ───────────────────┼─▶│  axum   │───▶│ dispatcher │───▶│round-robin│  │
//!                      │  │ server  │    │            │    │ + slots   │  │
//!                      │  └─────────┘    └─────┬──────┘    └───────────┘  │
//!                      │                       │                          │
//!                      │                       ▼                          │
//!   Client Response    │  ┌─────────┐    ┌────────────┐                   │
//!   ◀──────────────────┼──│ rewrite │◀───│ forwarder  │◀──────────────────┼──── Upstream
//!                      │  │ (JSON)  │    │ (reqwest)  │                   │
//!                      │  └─────────┘    └────────────┘                   │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use api_proxy::config::load_config;
use api_proxy::lifecycle::{signals, startup, Shutdown};
use api_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "api-proxy")]
#[command(about = "Round-robin reverse proxy with per-endpoint concurrency limits", long_about = None)]
struct Cli {
    /// Host to listen on (overrides the config file)
    #[arg(short = 'l', long)]
    listen_host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(short = 'p', long)]
    listen_port: Option<u16>,

    /// Config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Apply `--listen-host` / `--listen-port` on top of the configured address.
fn bind_address(configured: &str, host: Option<&str>, port: Option<u16>) -> String {
    let (configured_host, configured_port) = configured
        .rsplit_once(':')
        .unwrap_or((configured, "8081"));
    let host = host.unwrap_or(configured_host);
    match port {
        Some(port) => format!("{}:{}", host, port),
        None => format!("{}:{}", host, configured_port),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    config.listener.bind_address = bind_address(
        &config.listener.bind_address,
        cli.listen_host.as_deref(),
        cli.listen_port,
    );

    let level = if cli.debug {
        "debug".to_string()
    } else {
        config.observability.log_level.clone()
    };
    logging::init(&level);

    tracing::info!("api-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        endpoints = config.endpoints.len(),
        rewrite = config.rewrite.enabled,
        "Configuration loaded"
    );

    let (server, listener) = startup::start(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
