//! Command-line surface, mirroring `__main__.py`'s `save`/`use_saved`/`revise`
//! parameters plus the shard-prefix scoping of spec.md §4.1/§4.8.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hdx-sweep", about = "Change-detection sweep over HDX-registered resource links")]
pub struct Cli {
    /// Path to a YAML configuration file layered over the built-in defaults.
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Save every downloaded catalog record to a replay fixture for later runs.
    #[arg(long)]
    pub save: bool,

    /// Use a previously saved replay fixture instead of querying the catalog.
    #[arg(long)]
    pub use_saved: bool,

    /// Apply the resulting revision plan to the catalog (otherwise dry-run).
    #[arg(long)]
    pub revise: bool,

    /// Restrict the sweep to resource ids starting with this hex prefix
    /// (spec.md §4.8's `id:<prefix>*` scoping), bypassing the distributed
    /// partitioner.
    #[arg(long)]
    pub shard: Option<String>,
}
