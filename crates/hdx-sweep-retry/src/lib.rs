//! Retry Policy (C3, spec.md §4.3): outcome classification and exponential
//! backoff with per-status minimum amplification.

pub mod backoff;
pub mod classify;
pub mod events;
pub mod policy;

pub use backoff::backoff_duration;
pub use classify::{Failure, RETRYABLE_STATUSES};
pub use events::RetryEvent;
pub use policy::RetryPolicy;
