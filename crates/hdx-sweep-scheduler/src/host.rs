//! Host Scheduler (C2, spec.md §4.2): combines the per-host rate limiter
//! ([`crate::bucket::RateLimiter`]) with a per-host bulkhead (a concurrency
//! semaphore, teacher-style — see `tower-resilience-bulkhead`) and a
//! process-wide connection cap.

use crate::bucket::RateLimiter;
use hdx_sweep_core::config::SchedulerConfig;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

struct HostLimits {
    rate: RateLimiter,
    concurrency: Arc<Semaphore>,
}

impl HostLimits {
    fn new(config: &SchedulerConfig) -> Self {
        Self {
            rate: RateLimiter::new(
                config.requests_per_second_per_host,
                std::time::Duration::from_secs(1),
            ),
            concurrency: Arc::new(Semaphore::new(config.max_concurrent_per_host)),
        }
    }
}

/// Dispatches probe work so that no host ever exceeds its rate or
/// concurrency budget, while leaving unrelated hosts free to proceed
/// (spec.md §4.2 (a)-(c)). Shared across concurrently running probe tasks
/// behind an `Arc`; `acquire` only needs `&self`.
pub struct HostScheduler {
    hosts: RwLock<HashMap<String, Arc<HostLimits>>>,
    global: Arc<Semaphore>,
    config: SchedulerConfig,
}

/// Held while a probe is in flight; releases both the per-host and global
/// concurrency slots on drop. The rate-limit token itself is not held open —
/// once a request has started, later requests to the same host are free to
/// start as soon as the 1-second window has room, independent of whether
/// this probe has finished.
pub struct HostPermit {
    _host: OwnedSemaphorePermit,
    _global: OwnedSemaphorePermit,
}

impl HostScheduler {
    /// Pre-sizes one rate limiter and bulkhead per netloc observed while
    /// loading the resource table (spec.md §4.1), plus the global cap.
    pub fn new(netlocs: impl IntoIterator<Item = String>, config: SchedulerConfig) -> Self {
        let hosts = netlocs
            .into_iter()
            .map(|netloc| {
                let limits = Arc::new(HostLimits::new(&config));
                (netloc, limits)
            })
            .collect();

        Self {
            hosts: RwLock::new(hosts),
            global: Arc::new(Semaphore::new(config.global_concurrency_cap)),
            config,
        }
    }

    fn limits_for(&self, netloc: &str) -> Arc<HostLimits> {
        if let Some(limits) = self.hosts.read().expect("lock poisoned").get(netloc) {
            return Arc::clone(limits);
        }
        // Hosts absent from the resource-table scan (shouldn't normally
        // happen) are admitted lazily with fresh limiters rather than
        // rejected — the scan is a sizing hint, not a closed set.
        let mut hosts = self.hosts.write().expect("lock poisoned");
        Arc::clone(
            hosts
                .entry(netloc.to_string())
                .or_insert_with(|| Arc::new(HostLimits::new(&self.config))),
        )
    }

    /// Blocks until starting a request against `netloc` is permitted under
    /// the rate limit, per-host concurrency limit, and global cap, in that
    /// order.
    pub async fn acquire(&self, netloc: &str) -> HostPermit {
        let limits = self.limits_for(netloc);

        limits.rate.acquire().await;
        let host_permit = Arc::clone(&limits.concurrency)
            .acquire_owned()
            .await
            .expect("host semaphore is never closed");
        let global_permit = Arc::clone(&self.global)
            .acquire_owned()
            .await
            .expect("global semaphore is never closed");

        HostPermit {
            _host: host_permit,
            _global: global_permit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn acquire_succeeds_for_known_and_unknown_hosts() {
        let scheduler = HostScheduler::new(
            vec!["example.org".to_string()],
            SchedulerConfig {
                requests_per_second_per_host: 100,
                max_concurrent_per_host: 10,
                global_concurrency_cap: 100,
            },
        );
        let _p1 = scheduler.acquire("example.org").await;
        let _p2 = scheduler.acquire("unseen.example.org").await;
    }

    #[tokio::test(start_paused = true)]
    async fn per_host_concurrency_blocks_beyond_capacity() {
        let scheduler = Arc::new(HostScheduler::new(
            vec!["example.org".to_string()],
            SchedulerConfig {
                requests_per_second_per_host: 1000,
                max_concurrent_per_host: 1,
                global_concurrency_cap: 1000,
            },
        ));
        let permit = scheduler.acquire("example.org").await;

        let scheduler2 = Arc::clone(&scheduler);
        let handle = tokio::spawn(async move {
            scheduler2.acquire("example.org").await;
        });

        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        drop(permit);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("acquire should complete once the permit is released")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn different_hosts_do_not_block_each_other() {
        let scheduler = HostScheduler::new(
            vec!["a.example.org".to_string(), "b.example.org".to_string()],
            SchedulerConfig {
                requests_per_second_per_host: 1,
                max_concurrent_per_host: 1,
                global_concurrency_cap: 1000,
            },
        );
        let _a = scheduler.acquire("a.example.org").await;
        tokio::time::timeout(Duration::from_millis(10), scheduler.acquire("b.example.org"))
            .await
            .expect("a slow host must not block an unrelated host");
    }
}
