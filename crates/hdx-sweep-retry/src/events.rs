//! Retry events, observed via [`hdx_sweep_core::events`] the way the teacher's
//! middlewares expose a `RetryEvent`/`EventListeners` pair.

use crate::classify::Failure;
use hdx_sweep_core::events::SweepEvent;

#[derive(Debug, Clone)]
pub enum RetryEvent {
    /// An attempt failed and will be retried after `wait`.
    Retrying {
        attempt: usize,
        failure: Failure,
        wait: std::time::Duration,
    },
    /// Retries were exhausted; the last failure is surfaced to the prober.
    Exhausted { attempts: usize, failure: Failure },
}

impl SweepEvent for RetryEvent {
    fn kind(&self) -> &'static str {
        match self {
            RetryEvent::Retrying { .. } => "retry_retrying",
            RetryEvent::Exhausted { .. } => "retry_exhausted",
        }
    }
}
