//! Upstream forwarding.
//!
//! # Responsibilities
//! - Mirror the inbound request onto the selected endpoint
//! - Apply the endpoint timeout; never follow redirects
//! - Turn transport failures into a `ForwardError` with a readable description
//!
//! # Design Decisions
//! - Bodies are fully buffered in both directions
//! - No retry and no failover: a failure is final for the request

use std::error::Error as _;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use thiserror::Error;

use crate::http::request::InboundRequest;
use crate::load_balancer::Endpoint;

/// Raw response obtained from an upstream.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Transport-level failure while talking to an upstream.
#[derive(Debug, Error)]
#[error("{description}")]
pub struct ForwardError {
    description: String,
    timed_out: bool,
}

impl ForwardError {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_timeout(&self) -> bool {
        self.timed_out
    }
}

impl From<reqwest::Error> for ForwardError {
    fn from(err: reqwest::Error) -> Self {
        let timed_out = err.is_timeout();
        let mut description = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            description.push_str(": ");
            description.push_str(&cause.to_string());
            source = cause.source();
        }
        Self {
            description,
            timed_out,
        }
    }
}

/// Send `request` to `endpoint` and read the whole response.
pub async fn forward(
    endpoint: &Endpoint,
    request: &InboundRequest,
) -> Result<UpstreamResponse, ForwardError> {
    let url = format!("{}{}", endpoint.address(), request.path_and_query());

    let mut outbound = endpoint
        .client()
        .request(request.method().clone(), url.as_str())
        .headers(request.forwarded_headers())
        .timeout(endpoint.timeout());
    if !request.body().is_empty() {
        outbound = outbound.body(request.body().clone());
    }

    let response = outbound.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?;

    Ok(UpstreamResponse {
        status,
        headers,
        body,
    })
}
