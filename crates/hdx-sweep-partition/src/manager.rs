//! Task Partitioner (C8, spec.md §4.8): scans the shard list in order,
//! claiming the first shard that is unclaimed, stale, or abandoned.
//!
//! Kept async end to end — the original's `sync_acquire_task`/`sync_finish_task`
//! facade (a private event loop wrapping the async methods for non-async
//! callers) has no counterpart here, since the sweep driver is already async.

use crate::store::{ClaimWrite, SharedStore};
use hdx_sweep_core::config::PartitionConfig;
use hdx_sweep_core::SweepResult;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub struct TaskPartitioner {
    store: Arc<dyn SharedStore>,
    shards: Vec<String>,
    instance_id: String,
    config: PartitionConfig,
}

impl TaskPartitioner {
    pub fn new(store: Arc<dyn SharedStore>, shards: Vec<String>, instance_id: String, config: PartitionConfig) -> Self {
        Self {
            store,
            shards,
            instance_id,
            config,
        }
    }

    /// Scans shards in order (spec.md §4.8 step 2), claiming the first one
    /// that is unlocked, stale (started more than `steal_after` ago), or
    /// abandoned (no progress in `stale_progress_after`). Returns `None` once
    /// every shard is either finished or held fresh by another worker.
    pub async fn acquire(&self) -> SweepResult<Option<String>> {
        let now = now_unix();

        for shard in &self.shards {
            let state = self.store.read(shard).await?;

            if state.is_finished() {
                continue;
            }

            if state.is_unlocked() {
                self.store
                    .claim(
                        shard,
                        ClaimWrite {
                            lock: self.instance_id.clone(),
                            start_time: Some(now),
                            last_progress_time: now,
                        },
                    )
                    .await?;
                tracing::info!(shard, instance = %self.instance_id, "acquired task");
                return Ok(Some(shard.clone()));
            }

            let start_time = state.start_time.unwrap_or(now);
            if now - start_time > self.config.steal_after.as_secs() as i64 {
                self.store
                    .claim(
                        shard,
                        ClaimWrite {
                            lock: self.instance_id.clone(),
                            start_time: Some(now),
                            last_progress_time: now,
                        },
                    )
                    .await?;
                tracing::info!(shard, instance = %self.instance_id, "stole stale task");
                return Ok(Some(shard.clone()));
            }

            let last_progress = state.last_progress_time.unwrap_or(now);
            if now - last_progress > self.config.stale_progress_after.as_secs() as i64 {
                self.store
                    .claim(
                        shard,
                        ClaimWrite {
                            lock: self.instance_id.clone(),
                            // start_time is preserved, not reset (spec.md §4.8 step 2).
                            start_time: None,
                            last_progress_time: now,
                        },
                    )
                    .await?;
                tracing::info!(shard, instance = %self.instance_id, "took over stalled task");
                return Ok(Some(shard.clone()));
            }
        }

        Ok(None)
    }

    pub async fn update_progress(&self, shard: &str, progress: &str) -> SweepResult<()> {
        self.store.update_progress(shard, progress, now_unix()).await
    }

    pub async fn finish(&self, shard: &str) -> SweepResult<()> {
        self.store.finish(shard, now_unix()).await
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ShardState;
    use crate::store::fake::FakeStore;

    fn partitioner(store: Arc<FakeStore>) -> TaskPartitioner {
        TaskPartitioner::new(
            store,
            vec!["0".to_string(), "1".to_string()],
            "worker-a".to_string(),
            PartitionConfig {
                shard_prefix_length: 1,
                stale_progress_after: std::time::Duration::from_secs(7200),
                steal_after: std::time::Duration::from_secs(86400),
            },
        )
    }

    #[tokio::test]
    async fn claims_the_first_unlocked_shard() {
        let store = Arc::new(FakeStore::new());
        let partitioner = partitioner(Arc::clone(&store));

        let shard = partitioner.acquire().await.unwrap();
        assert_eq!(shard, Some("0".to_string()));

        let state = store.read("0").await.unwrap();
        assert_eq!(state.lock.as_deref(), Some("worker-a"));
        assert!(state.start_time.is_some());
    }

    #[tokio::test]
    async fn skips_finished_shards() {
        let store = Arc::new(FakeStore::new());
        store.seed(
            "0",
            ShardState {
                finish_time: Some(1),
                ..Default::default()
            },
        );
        let partitioner = partitioner(Arc::clone(&store));

        let shard = partitioner.acquire().await.unwrap();
        assert_eq!(shard, Some("1".to_string()));
    }

    #[tokio::test]
    async fn skips_a_shard_locked_fresh_by_another_worker() {
        let store = Arc::new(FakeStore::new());
        let now = now_unix();
        store.seed(
            "0",
            ShardState {
                lock: Some("worker-b".to_string()),
                start_time: Some(now),
                last_progress_time: Some(now),
                ..Default::default()
            },
        );
        let partitioner = partitioner(Arc::clone(&store));

        let shard = partitioner.acquire().await.unwrap();
        assert_eq!(shard, Some("1".to_string()));
    }

    #[tokio::test]
    async fn steals_a_shard_started_more_than_a_day_ago() {
        let store = Arc::new(FakeStore::new());
        let stale_start = now_unix() - 86_401;
        store.seed(
            "0",
            ShardState {
                lock: Some("worker-b".to_string()),
                start_time: Some(stale_start),
                last_progress_time: Some(stale_start),
                ..Default::default()
            },
        );
        let partitioner = partitioner(Arc::clone(&store));

        let shard = partitioner.acquire().await.unwrap();
        assert_eq!(shard, Some("0".to_string()));

        let state = store.read("0").await.unwrap();
        assert_eq!(state.lock.as_deref(), Some("worker-a"));
        assert!(state.start_time.unwrap() > stale_start);
    }

    #[tokio::test]
    async fn takes_over_a_shard_with_stale_progress_but_keeps_start_time() {
        let store = Arc::new(FakeStore::new());
        let original_start = now_unix() - 1000;
        let stale_progress = now_unix() - 7201;
        store.seed(
            "0",
            ShardState {
                lock: Some("worker-b".to_string()),
                start_time: Some(original_start),
                last_progress_time: Some(stale_progress),
                ..Default::default()
            },
        );
        let partitioner = partitioner(Arc::clone(&store));

        let shard = partitioner.acquire().await.unwrap();
        assert_eq!(shard, Some("0".to_string()));

        let state = store.read("0").await.unwrap();
        assert_eq!(state.lock.as_deref(), Some("worker-a"));
        assert_eq!(state.start_time, Some(original_start));
        assert!(state.last_progress_time.unwrap() > stale_progress);
    }

    #[tokio::test]
    async fn returns_none_once_every_shard_is_finished() {
        let store = Arc::new(FakeStore::new());
        store.seed(
            "0",
            ShardState {
                finish_time: Some(1),
                ..Default::default()
            },
        );
        store.seed(
            "1",
            ShardState {
                finish_time: Some(1),
                ..Default::default()
            },
        );
        let partitioner = partitioner(store);

        assert_eq!(partitioner.acquire().await.unwrap(), None);
    }

    #[tokio::test]
    async fn finish_marks_the_shard_done() {
        let store = Arc::new(FakeStore::new());
        let partitioner = partitioner(Arc::clone(&store));
        partitioner.finish("0").await.unwrap();
        assert!(store.read("0").await.unwrap().is_finished());
    }
}
