//! Command dispatch: bridges CLI args -> simulator actions -> output formatting.

pub mod config_cmd;
pub mod routers;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Build the lab for this invocation and run a router command against it.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let (_, lab) = config::build_lab(global)?;
    tracing::debug!(command = ?cmd, "dispatching command");
    let result = routers::handle(cmd, &lab, global).await;
    lab.simulator.shutdown();
    result
}
