//! Host Scheduler (C2, spec.md §4.2): host-fair rate limiting, per-host and
//! global concurrency bounds, and the list-distribute submission-order
//! transform.

mod bucket;
mod distribute;
mod host;

pub use distribute::list_distribute;
pub use host::{HostPermit, HostScheduler};
