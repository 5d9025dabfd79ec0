//! Task Partitioner (C8, spec.md §4.8): distributed hex-prefix shard
//! acquisition over a shared KV store.

pub mod manager;
pub mod redis_store;
pub mod shard;
pub mod state;
pub mod store;

pub use manager::TaskPartitioner;
pub use redis_store::RedisStore;
pub use shard::generate_shards;
pub use state::ShardState;
pub use store::{ClaimWrite, SharedStore};
