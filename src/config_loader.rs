//! Layered configuration loading (spec.md §6): defaults supplied in code by
//! [`hdx_sweep_core::SweepConfig`]'s `Default` impl, overridden by an
//! optional YAML file, overridden by environment variables, overridden by
//! explicit CLI flags (applied last, in [`crate::build_config`]).

use crate::cli::Cli;
use hdx_sweep_core::{SweepConfig, SweepError, SweepResult};

pub fn load_config(cli: &Cli) -> SweepResult<SweepConfig> {
    let raw = config::Config::builder()
        .add_source(config::File::from(cli.config.clone()).required(false))
        .add_source(config::Environment::with_prefix("HDX_SWEEP").separator("__"))
        .build()
        .map_err(SweepError::Config)?;

    let mut sweep_config: SweepConfig = raw.try_deserialize().map_err(SweepError::Config)?;

    if cli.save {
        sweep_config.save_downloaded = true;
    }
    if cli.use_saved {
        sweep_config.use_saved = true;
    }
    if cli.revise {
        sweep_config.revise = true;
    }

    Ok(sweep_config)
}
