//! Round-robin HTTP reverse proxy with per-endpoint concurrency caps and
//! optional script conversion of JSON responses.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod rewrite;

pub use config::ProxyConfig;
pub use http::{Dispatcher, HttpServer};
pub use lifecycle::Shutdown;
