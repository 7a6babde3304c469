//! Endpoint registry.
//!
//! # Responsibilities
//! - Build every endpoint and its outbound client from configuration
//! - Keep endpoints in configuration order for the lifetime of the process

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::EndpointConfig;
use crate::load_balancer::endpoint::Endpoint;

/// Errors raised while building the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The outbound client for an endpoint could not be created.
    #[error("failed to build client for endpoint {address}: {source}")]
    Client {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("endpoint {address} timeout of {timeout_secs}s is out of range")]
    Timeout { address: String, timeout_secs: f64 },
}

/// Immutable, ordered set of upstream endpoints.
#[derive(Debug, Default)]
pub struct Registry {
    endpoints: Vec<Arc<Endpoint>>,
}

impl Registry {
    /// Build the registry from validated endpoint configuration.
    pub fn from_config(configs: &[EndpointConfig]) -> Result<Self, RegistryError> {
        let mut endpoints = Vec::with_capacity(configs.len());

        for config in configs {
            let timeout = Duration::try_from_secs_f64(config.timeout_secs).map_err(|_| {
                RegistryError::Timeout {
                    address: config.address.clone(),
                    timeout_secs: config.timeout_secs,
                }
            })?;
            let endpoint = Endpoint::new(&config.address, config.max_concurrency, timeout)
            .map_err(|source| RegistryError::Client {
                address: config.address.clone(),
                source,
            })?;

            if config.max_concurrency == 0 {
                tracing::warn!(
                    address = %config.address,
                    "Endpoint has max_concurrency = 0 and will never be selected"
                );
            }

            tracing::debug!(
                address = %endpoint.address(),
                max_concurrency = config.max_concurrency,
                timeout_secs = config.timeout_secs,
                "Endpoint registered"
            );
            endpoints.push(Arc::new(endpoint));
        }

        Ok(Self { endpoints })
    }

    /// Wrap already built endpoints.
    pub fn new(endpoints: Vec<Arc<Endpoint>>) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &[Arc<Endpoint>] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Sum of free slots across all endpoints.
    pub fn total_available_slots(&self) -> usize {
        self.endpoints.iter().map(|e| e.available_slots()).sum()
    }
}
