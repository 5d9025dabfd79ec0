//! The catalog API client (search/read/revise) is an out-of-scope
//! collaborator (spec.md §1); these traits are the seam the sweep driver
//! talks to, so tests and `--use-saved` replay runs never need a live HDX
//! connection — mirroring how [`hdx_sweep_core::ResourceTable::load`] takes
//! a plain iterator rather than reaching into the network itself.
//!
//! [`FixtureCatalog`] reads and writes `fixture_path`, never `csv_path` —
//! the latter is the aggregated audit report's output file, not an input.

use async_trait::async_trait;
use hdx_sweep_core::{RawResourceRecord, SweepError, SweepResult};
use hdx_sweep_plan::RevisionPlan;
use std::path::{Path, PathBuf};

/// The read side: lists resources, optionally scoped to a shard prefix
/// (spec.md §4.8's `id:<prefix>*`).
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn list_resources(&self, shard_prefix: Option<&str>) -> SweepResult<Vec<RawResourceRecord>>;
}

/// The write side: applies a revision plan. The `--revise` gate lives at the
/// call site in [`crate::sweep`], not here — this trait only knows how to
/// apply, not whether it should.
#[async_trait]
pub trait CatalogUpdater: Send + Sync {
    async fn apply(&self, plan: &RevisionPlan) -> SweepResult<()>;
}

/// Stands in for the out-of-scope live catalog client when `use_saved` is
/// `false`: this binary ships no network-backed `CatalogClient`, so a normal
/// (non-replay) run fails fast with a clear `CatalogUnavailable` instead of
/// silently falling back to fixture data.
pub struct LiveCatalogUnavailable;

#[async_trait]
impl CatalogClient for LiveCatalogUnavailable {
    async fn list_resources(&self, _shard_prefix: Option<&str>) -> SweepResult<Vec<RawResourceRecord>> {
        Err(SweepError::CatalogUnavailable(
            "no live catalog client is wired into this binary; pass --use-saved to replay a fixture"
                .to_string(),
        ))
    }
}

/// A JSON-file-backed catalog, for `--save`/`--use-saved` replay runs and for
/// integration tests: `save_downloaded` writes whatever a real client
/// returned, and `use_saved` reads it back on a later run without touching
/// the network.
pub struct FixtureCatalog {
    path: PathBuf,
}

impl FixtureCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(path: impl AsRef<Path>, records: &[RawResourceRecord]) -> SweepResult<()> {
        let json = serde_json::to_string_pretty(records)
            .expect("RawResourceRecord serialization is infallible");
        std::fs::write(path.as_ref(), json).map_err(|source| SweepError::AuditReportWrite {
            path: path.as_ref().display().to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogClient for FixtureCatalog {
    async fn list_resources(&self, shard_prefix: Option<&str>) -> SweepResult<Vec<RawResourceRecord>> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            SweepError::CatalogUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        let records: Vec<RawResourceRecord> = serde_json::from_str(&contents)
            .map_err(|e| SweepError::CatalogUnavailable(format!("malformed fixture: {e}")))?;

        Ok(match shard_prefix {
            Some(prefix) => records
                .into_iter()
                .filter(|r| r.resource_id.starts_with(prefix))
                .collect(),
            None => records,
        })
    }
}
