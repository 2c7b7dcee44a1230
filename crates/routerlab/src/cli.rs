//! Clap derive structures for the `routerlab` CLI.
//!
//! Also compiled by `build.rs` for man page generation, so this file must
//! only depend on clap, clap_complete, and std.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// routerlab -- drive a simulated router lab from the command line
#[derive(Debug, Parser)]
#[command(
    name = "routerlab",
    version,
    about = "Drive a simulated router lab from the command line",
    long_about = "Connect, restart, ping, and reconfigure simulated routers.\n\n\
        Nothing touches a real device: every action updates an in-memory\n\
        inventory and prints the lab's activity log.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "ROUTERLAB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Router inventory JSON file (overrides the config file)
    #[arg(long, short = 'i', env = "ROUTERLAB_INVENTORY", global = true)]
    pub inventory: Option<PathBuf>,

    /// Restart delay in milliseconds (overrides the config file)
    #[arg(long, global = true)]
    pub restart_delay_ms: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ROUTERLAB_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List routers in the inventory
    #[command(alias = "ls")]
    List,

    /// Show one router in detail
    Show {
        /// Router ID
        id: String,
    },

    /// Simulate connecting to a router
    Connect {
        /// Router ID
        id: String,
    },

    /// Log a router's address and status
    View {
        /// Router ID
        id: String,
    },

    /// Simulate a router restart
    Restart {
        /// Router ID
        id: String,

        /// Return immediately instead of waiting for the restart to finish
        #[arg(long)]
        no_wait: bool,
    },

    /// Show a router's interfaces, optionally toggling one
    #[command(alias = "if")]
    Interfaces {
        /// Router ID
        id: String,

        /// Interface to flip between up and down
        #[arg(long, short = 't')]
        toggle: Option<String>,
    },

    /// Configure a router's BGP neighbor
    Bgp {
        /// Router ID
        id: String,

        /// Neighbor IP address
        neighbor_ip: String,

        /// Neighbor AS number (e.g. 65001 or AS65001)
        neighbor_as: String,
    },

    /// Simulated ping between two routers (exit 1 when unreachable)
    Ping {
        /// Source router ID
        from: String,

        /// Target router ID
        to: String,
    },

    /// Mark every router connected
    ConnectAll,

    /// Mark every router unauthorized, as if the ODL controller failed
    #[command(alias = "fail")]
    SimulateFailure,

    /// Show the lab topology (ring plus controller)
    #[command(alias = "topo")]
    Topology,

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the resolved configuration
    Show,

    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
