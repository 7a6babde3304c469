//! Inbound request model.
//!
//! # Responsibilities
//! - Capture method, path, headers and the fully buffered body
//! - Produce the header set forwarded upstream (everything but `Host`)

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, Uri};

/// A fully buffered inbound request, ready to be forwarded.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    method: Method,
    path_and_query: String,
    headers: HeaderMap,
    body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) -> Self {
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Self {
            method,
            path_and_query,
            headers,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path plus query string, always starting with `/`.
    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Headers to send upstream: all inbound headers except `Host`.
    ///
    /// Repeated headers (e.g. several `Cookie` lines) are kept as-is.
    pub fn forwarded_headers(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        headers.remove(header::HOST);
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_headers_drop_host_only() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("proxy.local:8081"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("b=2"));

        let uri: Uri = "/v1/chat/completions?stream=false".parse().unwrap();
        let req = InboundRequest::new(Method::POST, &uri, headers, Bytes::from_static(b"{}"));

        let forwarded = req.forwarded_headers();
        assert!(forwarded.get(header::HOST).is_none());
        assert_eq!(forwarded.get(header::AUTHORIZATION).unwrap(), "Bearer t");
        assert_eq!(forwarded.get_all(header::COOKIE).iter().count(), 2);
        assert_eq!(req.path_and_query(), "/v1/chat/completions?stream=false");
    }

    #[test]
    fn test_absolute_uri_uses_path() {
        let uri: Uri = "http://proxy.local/models".parse().unwrap();
        let req = InboundRequest::new(Method::GET, &uri, HeaderMap::new(), Bytes::new());
        assert_eq!(req.path_and_query(), "/models");
    }
}
