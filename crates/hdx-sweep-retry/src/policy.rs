//! Retry Policy (C3, spec.md §4.3): drives a caller-supplied attempt closure
//! through up to `max_attempts` tries, sleeping [`crate::backoff::backoff_duration`]
//! between retryable failures, and surfacing the last failure on exhaustion
//! (spec.md §7 policy: "exhaustion of retries surfaces the last observed
//! failure to the prober, which converts it to an integer `status`").

use crate::backoff::backoff_duration;
use crate::classify::Failure;
use crate::events::RetryEvent;
use hdx_sweep_core::config::RetryConfig;
use hdx_sweep_core::events::EventListeners;
use std::future::Future;

/// Wraps a [`RetryConfig`] with the event-listener machinery, the way the
/// teacher's `RetryLayer` wraps its `RetryConfig`.
pub struct RetryPolicy {
    config: RetryConfig,
    listeners: EventListeners<RetryEvent>,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            listeners: EventListeners::new(),
        }
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: hdx_sweep_core::events::EventListener<RetryEvent> + 'static,
    {
        self.listeners.add(listener);
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs `attempt` (1-based attempt number in, `Result<T, Failure>` out)
    /// up to `max_attempts` times. Retries are strictly sequential within one
    /// resource (spec.md §5 ordering guarantees): this never spawns, never
    /// overlaps a sleep with another attempt.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, Failure>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        let mut attempt_number = 1;
        loop {
            match attempt(attempt_number).await {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    let exhausted = attempt_number >= self.config.max_attempts;
                    if !failure.is_retryable() || exhausted {
                        self.listeners.emit(&RetryEvent::Exhausted {
                            attempts: attempt_number,
                            failure,
                        });
                        return Err(failure);
                    }

                    let wait = backoff_duration(&self.config, attempt_number, failure);
                    self.listeners.emit(&RetryEvent::Retrying {
                        attempt: attempt_number,
                        failure,
                        wait,
                    });
                    tokio::time::sleep(wait).await;
                    attempt_number += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            multiplier: 2.0,
            min_wait: Duration::from_millis(1),
            min_multiplier: 8.0,
            amplified_statuses: vec![429],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_without_retrying_on_first_try() {
        let policy = RetryPolicy::new(config());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        let result = policy
            .run(|_| {
                let calls = Arc::clone(&calls2);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Failure>(42)
                }
            })
            .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_retryable_failures_up_to_max_attempts() {
        let policy = RetryPolicy::new(config());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        let result = policy
            .run(|_| {
                let calls = Arc::clone(&calls2);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>(Failure::Http(503))
                }
            })
            .await;
        assert_eq!(result, Err(Failure::Http(503)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_failure_stops_after_one_attempt() {
        let policy = RetryPolicy::new(config());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        let result = policy
            .run(|_| {
                let calls = Arc::clone(&calls2);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<i32, _>(Failure::Http(403))
                }
            })
            .await;
        assert_eq!(result, Err(Failure::Http(403)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_a_retry() {
        let policy = RetryPolicy::new(config());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        let result = policy
            .run(|attempt| {
                let calls = Arc::clone(&calls2);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if attempt == 1 {
                        Err(Failure::Transport)
                    } else {
                        Ok(99)
                    }
                }
            })
            .await;
        assert_eq!(result, Ok(99));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
