//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, body limit, method filter)
//!     → request.rs (buffered InboundRequest)
//!     → dispatch.rs (select endpoint, forward, rewrite)
//!     → forward.rs (outbound call to the endpoint)
//!     → response.rs (status, headers, body back to the client)
//! ```

pub mod dispatch;
pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::Dispatcher;
pub use forward::{forward, ForwardError, UpstreamResponse};
pub use request::InboundRequest;
pub use response::{ProxyResponse, NO_AVAILABLE_SERVER};
pub use server::HttpServer;
