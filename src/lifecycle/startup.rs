//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the endpoint registry and dispatcher from validated configuration
//! - Start the metrics exporter when enabled
//! - Bind the listener last, so traffic only arrives once everything is ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::dispatch::Dispatcher;
use crate::http::HttpServer;
use crate::load_balancer::{Registry, RegistryError};
use crate::observability::metrics;
use crate::rewrite::{ConversionProfile, Rewriter, UnknownProfile};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Profile(#[from] UnknownProfile),

    #[error("invalid address '{0}'")]
    Address(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Build the dispatcher: registry, selector and optional rewriter.
pub fn build_dispatcher(config: &ProxyConfig) -> Result<Dispatcher, StartupError> {
    let registry = Arc::new(Registry::from_config(&config.endpoints)?);

    let rewriter = if config.rewrite.enabled {
        let profile: ConversionProfile = config.rewrite.profile.parse()?;
        tracing::info!(profile = ?profile, "Response rewriting enabled");
        Some(Rewriter::from_profile(profile))
    } else {
        None
    };

    Ok(Dispatcher::new(registry, rewriter))
}

/// Initialize every subsystem and bind the listener.
pub async fn start(config: ProxyConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config)?;

    let bind_address = server.config().listener.bind_address.clone();
    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address.clone(),
            source,
        })?;

    Ok((server, listener))
}
