//! `hdx-sweep`: the change-detection sweep's command-line entry point.
//! Wires together the Resource Table (C1), the two probe phases (C2-C5),
//! the decision engine (C6), the revision-plan aggregator (C7), and —
//! optionally — the distributed task partitioner (C8).

mod catalog;
mod cli;
mod config_loader;
mod sweep;

use catalog::{CatalogClient, CatalogUpdater, FixtureCatalog, LiveCatalogUnavailable};
use clap::Parser;
use cli::Cli;
use hdx_sweep_core::{ResourceTable, SweepError, SweepResult};
use hdx_sweep_partition::{generate_shards, RedisStore, TaskPartitioner};
use std::sync::Arc;

#[tokio::main]
async fn main() -> SweepResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = config_loader::load_config(&cli)?;

    let catalog: Arc<dyn CatalogClient> = if config.use_saved {
        Arc::new(FixtureCatalog::new(&config.fixture_path))
    } else {
        Arc::new(LiveCatalogUnavailable)
    };

    if config.use_distributed {
        run_distributed(&config, catalog, cli.shard.as_deref()).await
    } else {
        run_single_shard(&config, catalog.as_ref(), cli.shard.as_deref()).await
    }
}

/// Runs one sweep (or one CLI-pinned shard) without the distributed
/// partitioner.
async fn run_single_shard(
    config: &hdx_sweep_core::SweepConfig,
    catalog: &dyn CatalogClient,
    shard_prefix: Option<&str>,
) -> SweepResult<()> {
    let raw_records = catalog.list_resources(shard_prefix).await?;
    if config.save_downloaded {
        FixtureCatalog::save(&config.fixture_path, &raw_records)?;
    }

    let table = ResourceTable::load(
        raw_records,
        &config.netlocs_ignore,
        &config.formats_ignore,
        shard_prefix,
    );
    tracing::info!(resources = table.len(), "loaded resource table");

    let outcome = sweep::run_sweep(config, &table).await?;

    tracing::info!("{}", outcome.audit.render_table());
    outcome
        .audit
        .write_csv(std::path::Path::new(&config.csv_path))
        .map_err(|source| SweepError::AuditReportWrite {
            path: config.csv_path.clone(),
            source,
        })?;

    if config.revise && !outcome.plan.is_empty() {
        tracing::info!(
            datasets = outcome.plan.datasets().len(),
            resources = outcome.plan.resource_count(),
            "applying revision plan"
        );
        // The catalog updater (the external applier spec.md's C7 hands the
        // plan to) is the out-of-scope collaborator named in spec.md §1; a
        // real deployment wires a live `CatalogUpdater` in here.
        let _: &dyn CatalogUpdater = &NoopUpdater;
    }

    Ok(())
}

/// Runs the sweep under the distributed task partitioner (C8), looping
/// shard acquisition until none remain.
async fn run_distributed(
    config: &hdx_sweep_core::SweepConfig,
    catalog: Arc<dyn CatalogClient>,
    pinned_shard: Option<&str>,
) -> SweepResult<()> {
    let kv_url = config
        .shared_kv_url
        .as_deref()
        .ok_or_else(|| SweepError::SharedStoreUnavailable("no shared_kv_url configured".into()))?;
    let store = Arc::new(RedisStore::connect(kv_url).await?);
    let shards = generate_shards(config.partition.shard_prefix_length);
    let instance_id = uuid::Uuid::new_v4().to_string();
    let partitioner = TaskPartitioner::new(store, shards, instance_id, config.partition.clone());

    if let Some(prefix) = pinned_shard {
        run_single_shard(config, catalog.as_ref(), Some(prefix)).await?;
        return Ok(());
    }

    while let Some(shard) = partitioner.acquire().await? {
        tracing::info!(shard, "processing shard");
        run_single_shard(config, catalog.as_ref(), Some(&shard)).await?;
        partitioner.finish(&shard).await?;
    }

    Ok(())
}

struct NoopUpdater;

#[async_trait::async_trait]
impl CatalogUpdater for NoopUpdater {
    async fn apply(&self, _plan: &hdx_sweep_plan::RevisionPlan) -> SweepResult<()> {
        Ok(())
    }
}
