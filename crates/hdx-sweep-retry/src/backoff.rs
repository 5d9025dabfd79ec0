//! Exponential backoff with per-status minimum amplification (spec.md §4.3),
//! an exact port of the original's `tenacity_custom_wait.custom_wait.__call__`:
//! no jitter, because the system is waiting for an unavailable upstream to
//! recover rather than contending with peers for a shared resource.

use crate::classify::Failure;
use hdx_sweep_core::config::RetryConfig;
use std::time::Duration;

/// The wait before `attempt` (1-based: the attempt that just failed) is
/// retried, given what it failed with.
pub fn backoff_duration(config: &RetryConfig, attempt: usize, failure: Failure) -> Duration {
    let exponent = (attempt.max(1) - 1) as i32;
    let grown = config.multiplier * 2f64.powi(exponent);

    let mut minimum = config.min_wait.as_secs_f64();
    if let Failure::Http(code) = failure {
        if config.amplified_statuses.contains(&code) {
            minimum *= config.min_multiplier;
        }
    }

    Duration::from_secs_f64(minimum.max(grown).max(0.0))
}
