//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → round_robin.rs (walk the registry from the shared cursor)
//!     → endpoint.rs (non-blocking slot acquisition)
//!     → SlotGuard handed to the forwarder, released on drop
//!     → or None when every endpoint is at capacity
//! ```
//!
//! # Design Decisions
//! - Registry is immutable after startup; only counters move
//! - Cursor and slot counters are atomics, no locks on the hot path
//! - Selection never waits for a slot to free up
//! - One outbound client per endpoint, sized to its concurrency limit

pub mod endpoint;
pub mod registry;
pub mod round_robin;

pub use endpoint::{Endpoint, SlotGuard};
pub use registry::{Registry, RegistryError};
pub use round_robin::RoundRobin;
