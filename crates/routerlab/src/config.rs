//! Config resolution for CLI invocations: file, env, then global flags.

use std::path::PathBuf;

use routerlab_config::{Config, Lab, Overrides};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file this invocation reads and writes.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(routerlab_config::config_path)
}

/// Load the config with `--inventory` / `--restart-delay-ms` layered on top.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let overrides = Overrides {
        inventory: global.inventory.clone(),
        restart_delay_ms: global.restart_delay_ms,
    };
    Ok(routerlab_config::load_config_with(
        &config_path(global),
        &overrides,
    )?)
}

pub fn build_lab(global: &GlobalOpts) -> Result<(Config, Lab), CliError> {
    let cfg = resolve(global)?;
    let lab = routerlab_config::build_lab(&cfg)?;
    tracing::debug!(routers = lab.simulator.store().len(), "lab ready");
    Ok((cfg, lab))
}
