//! Router model and simulated actions shared by the routerlab CLI and TUI.
//!
//! - **[`RouterStore`]**: explicitly owned, ordered router collection.
//!   Mutations publish a new snapshot through a `tokio::sync::watch`
//!   channel, which is what the TUI re-renders from.
//!
//! - **[`Simulator`]**: cheaply cloneable facade running the simulated
//!   actions (connect, view, restart, interfaces, BGP, ping) against the
//!   store. Restart completions are cancellable tokio tasks.
//!
//! - **[`LogSink`]** / **[`ActivityLog`]**: where human-readable activity
//!   lines go. The activity log keeps a bounded history and fans lines out
//!   to live subscribers.
//!
//! - **[`Topology`]**: ring-plus-controller graph derived from a snapshot.

pub mod error;
pub mod log;
pub mod model;
pub mod simulator;
pub mod store;
pub mod topology;

pub use error::CoreError;
pub use log::{ActivityLog, DEFAULT_LOG_CAPACITY, LogLine, LogSink};
pub use model::{BgpNeighbor, DEFAULT_INTERFACES, Indicator, LinkState, Router, RouterStatus};
pub use simulator::{DEFAULT_RESTART_DELAY, Simulator, SimulatorConfig};
pub use store::{RouterSnapshot, RouterStore};
pub use topology::{CONTROLLER_NODE, NodeTone, Topology, TopologyEdge, TopologyNode};
