//! Shared configuration for the routerlab CLI and TUI.
//!
//! TOML settings layered with `ROUTERLAB_*` environment variables, router
//! inventory loading, and translation into `routerlab_core` types. Both
//! binaries depend on this crate.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use routerlab_core::{
    ActivityLog, CoreError, DEFAULT_LOG_CAPACITY, Router, RouterStore, Simulator, SimulatorConfig,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to read inventory {path}: {source}")]
    InventoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse inventory {path}: {source}")]
    InventoryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid inventory: {0}")]
    Inventory(#[from] CoreError),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// JSON router inventory. The built-in three-router lab is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<PathBuf>,

    #[serde(default)]
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Delay before a simulated restart completes.
    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,

    /// Activity lines kept in memory.
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            restart_delay_ms: default_restart_delay_ms(),
            log_capacity: default_log_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    #[serde(default = "default_render_rate_ms")]
    pub render_rate_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            render_rate_ms: default_render_rate_ms(),
        }
    }
}

fn default_restart_delay_ms() -> u64 {
    2000
}
fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}
fn default_tick_rate_ms() -> u64 {
    250
}
fn default_render_rate_ms() -> u64 {
    33
}

impl Config {
    /// Reject values the simulator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.restart_delay_ms == 0 {
            return Err(validation("simulation.restart_delay_ms", "must be greater than 0"));
        }
        if self.simulation.log_capacity == 0 {
            return Err(validation("simulation.log_capacity", "must be greater than 0"));
        }
        if self.ui.tick_rate_ms == 0 || self.ui.render_rate_ms == 0 {
            return Err(validation("ui", "tick and render rates must be greater than 0"));
        }
        Ok(())
    }

    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            restart_delay: Duration::from_millis(self.simulation.restart_delay_ms),
        }
    }
}

fn validation(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "routerlab", "routerlab").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("routerlab");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Command-line values layered over the file and environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overrides {
    pub inventory: Option<PathBuf>,
    pub restart_delay_ms: Option<u64>,
}

/// Load the Config from `path` + environment. A missing file yields defaults.
///
/// Nested keys use a double underscore in the environment, e.g.
/// `ROUTERLAB_SIMULATION__RESTART_DELAY_MS=500`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    load_config_with(path, &Overrides::default())
}

/// Like [`load_config_from`], with `overrides` applied before validation.
pub fn load_config_with(path: &Path, overrides: &Overrides) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROUTERLAB_").split("__"));

    let mut config: Config = figment.extract()?;
    if let Some(inventory) = &overrides.inventory {
        config.inventory = Some(inventory.clone());
    }
    if let Some(delay) = overrides.restart_delay_ms {
        config.simulation.restart_delay_ms = delay;
    }
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Inventory ───────────────────────────────────────────────────────

/// The three-router lab used when no inventory file is configured.
pub fn default_inventory() -> Vec<Router> {
    vec![
        Router::new("R1", "10.0.0.1", 22, "connected"),
        Router::new("R2", "10.0.0.2", 22, "unauthorized"),
        Router::new("R3", "10.0.0.3", 22, "pending"),
    ]
}

/// Read a JSON array of routers from `path`.
pub fn load_inventory(path: &Path) -> Result<Vec<Router>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::InventoryRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::InventoryParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the router store for `cfg`, enforcing unique ids.
pub fn build_store(cfg: &Config) -> Result<RouterStore, ConfigError> {
    let routers = match cfg.inventory.as_deref() {
        Some(path) => load_inventory(path)?,
        None => default_inventory(),
    };
    Ok(RouterStore::from_routers(routers)?)
}

/// Everything a binary needs to run simulated actions.
pub struct Lab {
    pub simulator: Simulator,
    pub log: Arc<ActivityLog>,
}

/// Wire store, activity log, and simulator together from `cfg`.
pub fn build_lab(cfg: &Config) -> Result<Lab, ConfigError> {
    let store = Arc::new(build_store(cfg)?);
    let log = Arc::new(ActivityLog::new(cfg.simulation.log_capacity));
    let simulator = Simulator::new(cfg.simulator_config(), store, Arc::clone(&log) as _);
    Ok(Lab { simulator, log })
}
