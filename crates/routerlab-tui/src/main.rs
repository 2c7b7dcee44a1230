//! `routerlab-tui`: interactive console for the simulated router lab.
//!
//! Built on [ratatui](https://ratatui.rs). The Routers screen shows one card
//! per router with its action buttons; the Topology screen draws the ring
//! and the ODL controller and runs simulated pings. Every action's outcome
//! lands in the console pane at the bottom.
//!
//! Logs go to a file (default `$TMPDIR/routerlab-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod store_bridge;
mod theme;
mod tui;
mod widgets;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Interactive console for the simulated router lab.
#[derive(Parser, Debug)]
#[command(name = "routerlab-tui", version, about)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(short = 'c', long, env = "ROUTERLAB_CONFIG")]
    config: Option<PathBuf>,

    /// Router inventory (JSON). Overrides the config file.
    #[arg(short = 'i', long, env = "ROUTERLAB_INVENTORY")]
    inventory: Option<PathBuf>,

    /// Delay before a restarting router comes back, in milliseconds
    #[arg(long)]
    restart_delay_ms: Option<u64>,

    /// Log file path (defaults to routerlab-tui.log in the temp directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. The returned guard flushes on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "routerlab_tui={level},routerlab_core={level},routerlab_config={level},routerlab::activity=info"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("routerlab-tui.log"));
    let dir = log_file.parent().unwrap_or(Path::new("."));
    let name = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("routerlab-tui.log"));

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<routerlab_config::Config> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(routerlab_config::config_path);
    let overrides = routerlab_config::Overrides {
        inventory: cli.inventory.clone(),
        restart_delay_ms: cli.restart_delay_ms,
    };
    Ok(routerlab_config::load_config_with(&path, &overrides)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let cfg = load_config(&cli)?;
    let lab = routerlab_config::build_lab(&cfg)?;
    info!(
        routers = lab.simulator.store().len(),
        inventory = ?cfg.inventory,
        "starting routerlab-tui"
    );

    let mut app = App::new(lab, cfg.ui.clone());
    app.run().await?;

    Ok(())
}
