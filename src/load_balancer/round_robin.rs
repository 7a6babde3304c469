//! Concurrency-gated round-robin selection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::load_balancer::endpoint::SlotGuard;
use crate::load_balancer::registry::Registry;

/// Round-robin selector.
///
/// Walks the registry from a shared cursor and takes the first free slot it
/// finds. Each call visits every endpoint at most once and never waits.
#[derive(Debug)]
pub struct RoundRobin {
    registry: Arc<Registry>,
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Select the next endpoint with a free slot.
    ///
    /// Returns `None` after one full lap without a free slot. On success the
    /// cursor has moved past every position tried, so the next call resumes
    /// right after the selected endpoint.
    pub fn select(&self) -> Option<SlotGuard> {
        let endpoints = self.registry.endpoints();
        let len = endpoints.len();
        if len == 0 {
            return None;
        }

        // Claim the starting position; concurrent callers get distinct starts.
        let start = self.cursor.fetch_add(1, Ordering::Relaxed);

        for offset in 0..len {
            let endpoint = &endpoints[start.wrapping_add(offset) % len];
            if let Some(guard) = endpoint.try_acquire() {
                if offset > 0 {
                    self.cursor.fetch_add(offset, Ordering::Relaxed);
                }
                return Some(guard);
            }
        }

        self.cursor.fetch_add(len - 1, Ordering::Relaxed);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::endpoint::Endpoint;
    use std::time::Duration;

    fn registry(limits: &[usize]) -> Arc<Registry> {
        let endpoints = limits
            .iter()
            .enumerate()
            .map(|(i, limit)| {
                Arc::new(
                    Endpoint::new(
                        &format!("http://127.0.0.1:{}", 9000 + i),
                        *limit,
                        Duration::from_secs(1),
                    )
                    .unwrap(),
                )
            })
            .collect();
        Arc::new(Registry::new(endpoints))
    }

    fn addr(guard: &SlotGuard) -> String {
        guard.address().to_string()
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new(registry(&[1, 1, 1]));

        let mut seen = Vec::new();
        for _ in 0..6 {
            let guard = lb.select().unwrap();
            seen.push(addr(&guard));
        }

        assert_eq!(
            seen,
            vec![
                "http://127.0.0.1:9000",
                "http://127.0.0.1:9001",
                "http://127.0.0.1:9002",
                "http://127.0.0.1:9000",
                "http://127.0.0.1:9001",
                "http://127.0.0.1:9002",
            ]
        );
    }

    #[test]
    fn test_skips_full_endpoint_and_resumes_after_it() {
        let reg = registry(&[1, 1, 1]);
        let lb = RoundRobin::new(reg.clone());

        // Hold the only slot on the middle endpoint.
        let _held = reg.endpoints()[1].try_acquire().unwrap();

        let a = lb.select().unwrap();
        assert_eq!(addr(&a), "http://127.0.0.1:9000");
        drop(a);

        // 9001 is full, skipped; the cursor moves past both positions tried.
        let b = lb.select().unwrap();
        assert_eq!(addr(&b), "http://127.0.0.1:9002");
        drop(b);

        let c = lb.select().unwrap();
        assert_eq!(addr(&c), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_returns_none_when_all_full() {
        let reg = registry(&[1, 0, 1]);
        let lb = RoundRobin::new(reg.clone());

        let g1 = lb.select().unwrap();
        let g2 = lb.select().unwrap();
        assert!(lb.select().is_none());
        assert_eq!(reg.total_available_slots(), 0);

        // A single release makes the next selection succeed.
        drop(g1);
        let g3 = lb.select().unwrap();
        assert_eq!(addr(&g3), "http://127.0.0.1:9000");
        drop(g2);
        drop(g3);
        assert_eq!(reg.total_available_slots(), 2);
    }

    #[test]
    fn test_empty_registry() {
        let lb = RoundRobin::new(Arc::new(Registry::default()));
        assert!(lb.select().is_none());
    }

    #[test]
    fn test_slot_conservation_under_contention() {
        let reg = registry(&[2, 1, 3]);
        let lb = Arc::new(RoundRobin::new(reg.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lb = lb.clone();
                std::thread::spawn(move || {
                    let mut hits = 0usize;
                    for _ in 0..2_000 {
                        if let Some(guard) = lb.select() {
                            assert!(guard.in_flight() <= guard.concurrency_limit());
                            hits += 1;
                        }
                    }
                    hits
                })
            })
            .collect();

        let hits: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert!(hits > 0);
        for endpoint in reg.endpoints() {
            assert_eq!(endpoint.available_slots(), endpoint.concurrency_limit());
        }
    }
}
