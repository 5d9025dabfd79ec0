//! The shared-KV-store seam (spec.md §4.8): an async trait over whatever
//! backs `task:<prefix>` hashes, so the acquire/steal/takeover protocol in
//! [`crate::manager`] can be tested without a live Redis instance. The
//! production implementation is [`crate::redis_store::RedisStore`].

use crate::state::ShardState;
use async_trait::async_trait;
use hdx_sweep_core::SweepResult;

/// A claim write: every field the protocol ever sets together, so a single
/// call can always be expressed as one atomic write (spec.md §4.8: "the
/// partitioner's writes must be grouped so that `lock` and
/// `last_progress_time` appear atomically").
#[derive(Debug, Clone)]
pub struct ClaimWrite {
    pub lock: String,
    pub start_time: Option<i64>,
    pub last_progress_time: i64,
}

#[async_trait]
pub trait SharedStore: Send + Sync {
    async fn read(&self, shard: &str) -> SweepResult<ShardState>;
    async fn claim(&self, shard: &str, write: ClaimWrite) -> SweepResult<()>;
    async fn update_progress(&self, shard: &str, progress: &str, now: i64) -> SweepResult<()>;
    async fn finish(&self, shard: &str, now: i64) -> SweepResult<()>;
}
