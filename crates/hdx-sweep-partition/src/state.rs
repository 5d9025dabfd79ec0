//! Per-shard state as stored in the shared KV store (spec.md §3, §4.8):
//! the Rust mirror of the `task:<prefix>` hash the original keeps in Redis.

/// A snapshot of one shard's `task:<prefix>` hash entry. Unix timestamps
/// (seconds), matching the original's `int(time.time())`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardState {
    pub lock: Option<String>,
    pub start_time: Option<i64>,
    pub last_progress_time: Option<i64>,
    pub finish_time: Option<i64>,
    pub progress: Option<String>,
}

impl ShardState {
    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }

    pub fn is_unlocked(&self) -> bool {
        self.lock.is_none()
    }
}
