//! Per-request dispatch.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → RoundRobin::select (non-blocking)
//!         → None: 503 "No available server"
//!     → forward (bounded by the endpoint timeout)
//!         → Err: 500 with the failure description
//!     → Rewriter (when enabled; raw body on failure)
//!     → slot released, ProxyResponse returned
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::http::forward::{forward, UpstreamResponse};
use crate::http::request::InboundRequest;
use crate::http::response::ProxyResponse;
use crate::load_balancer::{Registry, RoundRobin};
use crate::observability::metrics;
use crate::rewrite::charset::charset_from_headers;
use crate::rewrite::Rewriter;

/// Selects an endpoint, forwards, and optionally rewrites the response.
#[derive(Debug)]
pub struct Dispatcher {
    selector: RoundRobin,
    rewriter: Option<Rewriter>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, rewriter: Option<Rewriter>) -> Self {
        Self {
            selector: RoundRobin::new(registry),
            rewriter,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.selector.registry()
    }

    pub fn rewrite_enabled(&self) -> bool {
        self.rewriter.is_some()
    }

    /// Handle one request end to end. Never fails: every error becomes a
    /// response, and the slot is released before returning.
    pub async fn dispatch(&self, request: InboundRequest) -> ProxyResponse {
        let start = Instant::now();
        let method = request.method().as_str().to_string();

        let Some(slot) = self.selector.select() else {
            tracing::debug!(
                method = %method,
                path = %request.path_and_query(),
                "No endpoint has a free slot"
            );
            metrics::record_no_endpoint();
            metrics::record_request(&method, 503, "none", start);
            return ProxyResponse::no_endpoint_available();
        };

        tracing::debug!(
            method = %method,
            path = %request.path_and_query(),
            endpoint = %slot.address(),
            in_flight = slot.in_flight(),
            "Forwarding request"
        );

        let response = match forward(&slot, &request).await {
            Ok(upstream) => self.finish(upstream),
            Err(e) => {
                tracing::warn!(
                    endpoint = %slot.address(),
                    timed_out = e.is_timeout(),
                    error = %e,
                    "Upstream request failed"
                );
                ProxyResponse::forward_failed(&e)
            }
        };

        metrics::record_request(&method, response.status.as_u16(), slot.address(), start);
        drop(slot);
        response
    }

    fn finish(&self, upstream: UpstreamResponse) -> ProxyResponse {
        let Some(rewriter) = &self.rewriter else {
            return ProxyResponse::from_upstream(upstream);
        };

        let charset = charset_from_headers(&upstream.headers);
        match rewriter.rewrite(&upstream.body, charset.as_deref()) {
            Ok(body) => ProxyResponse::rewritten(upstream, body),
            Err(e) => {
                tracing::warn!(
                    status = %upstream.status,
                    error = %e,
                    "Response rewrite failed, passing body through"
                );
                metrics::record_rewrite_fallback();
                ProxyResponse::from_upstream(upstream)
            }
        }
    }
}
