//! [`SharedStore`] backed by Redis, via the async, auto-reconnecting
//! `ConnectionManager` (ported from the original's `redis.asyncio.Redis`).

use crate::state::ShardState;
use crate::store::{ClaimWrite, SharedStore};
use async_trait::async_trait;
use hdx_sweep_core::{SweepError, SweepResult};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> SweepResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| SweepError::SharedStoreUnavailable(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| SweepError::SharedStoreUnavailable(e.to_string()))?;
        Ok(Self { conn })
    }

    fn key(shard: &str) -> String {
        format!("task:{shard}")
    }
}

#[async_trait]
impl SharedStore for RedisStore {
    async fn read(&self, shard: &str) -> SweepResult<ShardState> {
        let mut conn = self.conn.clone();
        let fields: std::collections::HashMap<String, String> = conn
            .hgetall(Self::key(shard))
            .await
            .map_err(|e| SweepError::SharedStoreUnavailable(e.to_string()))?;

        Ok(ShardState {
            lock: fields.get("lock").cloned(),
            start_time: fields.get("start_time").and_then(|v| v.parse().ok()),
            last_progress_time: fields
                .get("last_progress_time")
                .and_then(|v| v.parse().ok()),
            finish_time: fields.get("finish_time").and_then(|v| v.parse().ok()),
            progress: fields.get("progress").cloned(),
        })
    }

    async fn claim(&self, shard: &str, write: ClaimWrite) -> SweepResult<()> {
        let mut conn = self.conn.clone();
        let mut pairs: Vec<(&str, String)> = vec![
            ("lock", write.lock),
            ("last_progress_time", write.last_progress_time.to_string()),
        ];
        if let Some(start_time) = write.start_time {
            pairs.push(("start_time", start_time.to_string()));
        }
        conn.hset_multiple::<_, _, _, ()>(Self::key(shard), &pairs)
            .await
            .map_err(|e| SweepError::SharedStoreUnavailable(e.to_string()))
    }

    async fn update_progress(&self, shard: &str, progress: &str, now: i64) -> SweepResult<()> {
        let mut conn = self.conn.clone();
        let pairs = [
            ("progress", progress.to_string()),
            ("last_progress_time", now.to_string()),
        ];
        conn.hset_multiple::<_, _, _, ()>(Self::key(shard), &pairs)
            .await
            .map_err(|e| SweepError::SharedStoreUnavailable(e.to_string()))
    }

    async fn finish(&self, shard: &str, now: i64) -> SweepResult<()> {
        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(Self::key(shard), "finish_time", now.to_string())
            .await
            .map_err(|e| SweepError::SharedStoreUnavailable(e.to_string()))
    }
}
