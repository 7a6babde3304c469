//! Response produced by the dispatcher.
//!
//! # Responsibilities
//! - Carry status, headers and body back to the HTTP layer
//! - Build the fixed exhaustion (503) and transport failure (500) responses
//!
//! # Design Decisions
//! - Upstream headers are returned verbatim unless the body was rewritten,
//!   in which case framing headers are dropped and recomputed by the server

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::forward::{ForwardError, UpstreamResponse};

/// Body sent when every endpoint is at capacity.
pub const NO_AVAILABLE_SERVER: &str = "No available server";

/// Status, headers and body handed back to the caller.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ProxyResponse {
    /// Every endpoint is at capacity.
    pub fn no_endpoint_available() -> Self {
        Self::plain_text(StatusCode::SERVICE_UNAVAILABLE, NO_AVAILABLE_SERVER.to_string())
    }

    /// The upstream could not be reached or did not answer in time.
    pub fn forward_failed(err: &ForwardError) -> Self {
        Self::plain_text(StatusCode::INTERNAL_SERVER_ERROR, err.description().to_string())
    }

    /// Pass an upstream response through untouched.
    pub fn from_upstream(upstream: UpstreamResponse) -> Self {
        Self {
            status: upstream.status,
            headers: upstream.headers,
            body: upstream.body,
        }
    }

    /// Pass an upstream response through with a rewritten body.
    pub fn rewritten(upstream: UpstreamResponse, body: Vec<u8>) -> Self {
        let mut headers = upstream.headers;
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::TRANSFER_ENCODING);
        Self {
            status: upstream.status,
            headers,
            body: Bytes::from(body),
        }
    }

    fn plain_text(status: StatusCode, body: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        Self {
            status,
            headers,
            body: Bytes::from(body),
        }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
