//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the rewrite profile is known before startup
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;
use crate::rewrite::ConversionProfile;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("no endpoints configured")]
    NoEndpoints,

    #[error("endpoint #{index} address '{address}' is not a valid URL: {reason}")]
    InvalidAddress {
        index: usize,
        address: String,
        reason: String,
    },

    #[error("endpoint #{index} address '{address}' must use http or https")]
    UnsupportedScheme { index: usize, address: String },

    #[error("endpoint #{index} timeout must be a positive number of seconds, got {timeout_secs}")]
    InvalidTimeout { index: usize, timeout_secs: f64 },

    #[error("listener bind address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("unknown rewrite profile '{0}'")]
    UnknownProfile(String),

    #[error("metrics address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.endpoints.is_empty() {
        errors.push(ValidationError::NoEndpoints);
    }

    for (index, endpoint) in config.endpoints.iter().enumerate() {
        match Url::parse(&endpoint.address) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => errors.push(ValidationError::UnsupportedScheme {
                index,
                address: endpoint.address.clone(),
            }),
            Err(e) => errors.push(ValidationError::InvalidAddress {
                index,
                address: endpoint.address.clone(),
                reason: e.to_string(),
            }),
        }

        if endpoint.timeout_secs <= 0.0
            || Duration::try_from_secs_f64(endpoint.timeout_secs).is_err()
        {
            errors.push(ValidationError::InvalidTimeout {
                index,
                timeout_secs: endpoint.timeout_secs,
            });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.rewrite.enabled && config.rewrite.profile.parse::<ConversionProfile>().is_err() {
        errors.push(ValidationError::UnknownProfile(config.rewrite.profile.clone()));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
