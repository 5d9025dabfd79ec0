//! The configuration surface of spec.md §6 ("Configuration values recognized")
//! plus the tunables named throughout §4 (rate, concurrency, retry, timeouts).
//!
//! Defaults live here, in code, the way the teacher's `*ConfigBuilder`s embed
//! their defaults; `hdx-sweep`'s binary layers a YAML file and environment
//! variables over these via the `config` crate.

use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// Host scheduler tunables (spec.md §4.2).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Max requests started per second against a single host (`R`).
    pub requests_per_second_per_host: u32,
    /// Max concurrent in-flight connections to a single host (`K`).
    pub max_concurrent_per_host: usize,
    /// Global connection cap across all hosts.
    pub global_concurrency_cap: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            requests_per_second_per_host: 4,
            max_concurrent_per_host: 10,
            global_concurrency_cap: 100,
        }
    }
}

/// Retry/backoff tunables (spec.md §4.3).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub multiplier: f64,
    #[serde(with = "duration_secs")]
    pub min_wait: Duration,
    pub min_multiplier: f64,
    /// HTTP statuses whose minimum wait is amplified by `min_multiplier`.
    pub amplified_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: 2.0,
            min_wait: Duration::from_secs(4),
            min_multiplier: 8.0,
            amplified_statuses: vec![429],
        }
    }
}

/// Per-request timeouts (spec.md §4.4, §5).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    #[serde(with = "duration_secs")]
    pub connect: Duration,
    #[serde(with = "duration_secs")]
    pub total: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(30),
            total: Duration::from_secs(5 * 60),
        }
    }
}

/// Task partitioner tunables (spec.md §4.8).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Length, in hex digits, of each shard prefix.
    pub shard_prefix_length: usize,
    #[serde(with = "duration_secs")]
    pub stale_progress_after: Duration,
    #[serde(with = "duration_secs")]
    pub steal_after: Duration,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            shard_prefix_length: 1,
            stale_progress_after: Duration::from_secs(2 * 60 * 60),
            steal_after: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Top-level sweep configuration (spec.md §6).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub scheduler: SchedulerConfig,
    pub retry: RetryConfig,
    pub timeouts: TimeoutConfig,
    pub partition: PartitionConfig,

    pub user_agent: String,
    pub netlocs_ignore: HashSet<String>,
    pub formats_ignore: HashSet<String>,

    pub save_downloaded: bool,
    pub use_saved: bool,
    pub fixture_path: String,
    pub csv_path: String,
    pub revise: bool,
    pub use_distributed: bool,
    pub shared_kv_url: Option<String>,

    /// Substring that, when present in a URL, suppresses the XLSX
    /// canonical-row digest special case (spec.md §4.5 step 5).
    pub xlsx_url_ignore: Option<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            retry: RetryConfig::default(),
            timeouts: TimeoutConfig::default(),
            partition: PartitionConfig::default(),
            user_agent: "hdx-resource-changedetection".to_string(),
            netlocs_ignore: HashSet::new(),
            formats_ignore: HashSet::from(["web app".to_string()]),
            save_downloaded: false,
            use_saved: false,
            fixture_path: "fixture.json".to_string(),
            csv_path: "audit.csv".to_string(),
            revise: false,
            use_distributed: false,
            shared_kv_url: None,
            xlsx_url_ignore: None,
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
