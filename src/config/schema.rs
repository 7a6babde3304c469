//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Upstream endpoints, in round-robin order.
    pub endpoints: Vec<EndpointConfig>,

    /// Response rewriting settings.
    pub rewrite: RewriteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8081").
    pub bind_address: String,

    /// Largest inbound body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8081".to_string(),
            max_body_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Upstream endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Base URL of the upstream (e.g., "http://127.0.0.1:8000").
    #[serde(alias = "endpoint")]
    pub address: String,

    /// Maximum concurrent requests to this endpoint.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Outbound request timeout in seconds.
    #[serde(alias = "timeout", default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

fn default_max_concurrency() -> usize {
    1
}

fn default_timeout_secs() -> f64 {
    60.0
}

/// Response rewriting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Convert text fields of JSON responses.
    pub enabled: bool,

    /// Conversion profile (e.g., "s2twp", "t2s", "identity").
    pub profile: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            profile: "s2twp".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [[endpoints]]
            address = "http://127.0.0.1:8000"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:8081");
        assert_eq!(config.endpoints.len(), 1);
        assert_eq!(config.endpoints[0].max_concurrency, 1);
        assert_eq!(config.endpoints[0].timeout_secs, 60.0);
        assert!(!config.rewrite.enabled);
    }

    #[test]
    fn test_endpoint_aliases() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [[endpoints]]
            endpoint = "http://10.0.0.1:5000"
            max_concurrency = 3
            timeout = 600

            [rewrite]
            enabled = true
            profile = "s2t.json"
            "#,
        )
        .unwrap();

        let ep = &config.endpoints[0];
        assert_eq!(ep.address, "http://10.0.0.1:5000");
        assert_eq!(ep.max_concurrency, 3);
        assert_eq!(ep.timeout_secs, 600.0);
        assert!(config.rewrite.enabled);
        assert_eq!(config.rewrite.profile, "s2t.json");
    }
}
