//! Upstream endpoint abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream target
//! - Track free concurrency slots
//! - Enforce the per-endpoint concurrency limit without blocking
//! - Own the outbound client used to reach the endpoint

use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;

/// A single upstream endpoint.
#[derive(Debug)]
pub struct Endpoint {
    /// Base URL with any trailing `/` removed.
    address: String,
    /// Maximum simultaneous in-flight requests.
    concurrency_limit: usize,
    /// Free slots, always within `0..=concurrency_limit`.
    available_slots: AtomicUsize,
    /// Deadline for each outbound call.
    timeout: Duration,
    /// Outbound client scoped to this endpoint.
    client: reqwest::Client,
}

impl Endpoint {
    /// Create a new endpoint and its outbound client.
    ///
    /// The client never follows redirects and keeps at most
    /// `concurrency_limit` idle connections to the upstream.
    pub fn new(
        address: &str,
        concurrency_limit: usize,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .pool_max_idle_per_host(concurrency_limit)
            .no_proxy()
            .build()?;

        Ok(Self {
            address: address.trim_end_matches('/').to_string(),
            concurrency_limit,
            available_slots: AtomicUsize::new(concurrency_limit),
            timeout,
            client,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Current number of free slots.
    pub fn available_slots(&self) -> usize {
        self.available_slots.load(Ordering::Acquire)
    }

    /// Number of requests currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.concurrency_limit - self.available_slots()
    }

    /// Take one slot if any is free. Never waits.
    ///
    /// The returned guard gives the slot back when dropped.
    pub fn try_acquire(self: &Arc<Self>) -> Option<SlotGuard> {
        let mut current = self.available_slots.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return None;
            }
            match self.available_slots.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
        Some(SlotGuard {
            endpoint: self.clone(),
        })
    }

    fn release(&self) {
        let previous = self.available_slots.fetch_add(1, Ordering::AcqRel);
        debug_assert!(
            previous < self.concurrency_limit,
            "slot released more times than acquired"
        );
    }
}

/// A RAII guard owning one concurrency slot on an endpoint.
///
/// Dropping the guard releases the slot, on success, error and panic paths
/// alike.
#[derive(Debug)]
pub struct SlotGuard {
    endpoint: Arc<Endpoint>,
}

impl SlotGuard {
    pub fn endpoint(&self) -> &Arc<Endpoint> {
        &self.endpoint
    }
}

impl Deref for SlotGuard {
    type Target = Endpoint;
    fn deref(&self) -> &Self::Target {
        &self.endpoint
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.endpoint.release();
    }
}
