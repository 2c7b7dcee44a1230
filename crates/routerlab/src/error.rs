//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text
//! and stable exit codes.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use routerlab_config::ConfigError;
use routerlab_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Lookup ───────────────────────────────────────────────────────
    #[error("Router '{id}' not found")]
    #[diagnostic(
        code(routerlab::router_not_found),
        help("Run: routerlab list to see available routers")
    )]
    RouterNotFound { id: String },

    #[error("Interface '{interface}' not found on router '{id}'")]
    #[diagnostic(
        code(routerlab::interface_not_found),
        help("Run: routerlab interfaces {id} to see its interfaces")
    )]
    InterfaceNotFound { id: String, interface: String },

    // ── Simulation outcomes ──────────────────────────────────────────
    #[error("Ping from {from} to {to} failed (simulated)")]
    #[diagnostic(
        code(routerlab::ping_failed),
        help("Both routers must be connected. Try: routerlab connect-all")
    )]
    PingFailed { from: String, to: String },

    #[error("Restart of '{id}' did not complete within {waited_ms}ms")]
    #[diagnostic(code(routerlab::restart_timeout))]
    RestartTimeout { id: String, waited_ms: u128 },

    #[error("Activity log closed before the restart of '{id}' completed")]
    #[diagnostic(code(routerlab::restart_interrupted))]
    RestartInterrupted { id: String },

    #[error("The simulator has already shut down")]
    #[diagnostic(code(routerlab::shut_down))]
    ShutDown,

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(routerlab::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Config file already exists at {}", path.display())]
    #[diagnostic(
        code(routerlab::config_exists),
        help("Use --force to overwrite it, or edit it directly.")
    )]
    ConfigExists { path: PathBuf },

    #[error("Inventory rejected: duplicate router id '{id}'")]
    #[diagnostic(
        code(routerlab::duplicate_router),
        help("Router IDs must be unique within an inventory file.")
    )]
    DuplicateRouter { id: String },

    #[error(transparent)]
    #[diagnostic(code(routerlab::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(routerlab::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(routerlab::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(routerlab::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RouterNotFound { .. } | Self::InterfaceNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ConfigExists { .. } => exit_code::CONFLICT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError / ConfigError → CliError mapping ───────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RouterNotFound { id } => Self::RouterNotFound { id },
            CoreError::InterfaceNotFound { id, interface } => {
                Self::InterfaceNotFound { id, interface }
            }
            CoreError::DuplicateRouter { id } => Self::DuplicateRouter { id },
            CoreError::InvalidInput { field, reason } => Self::Validation { field, reason },
            CoreError::ShutDown => Self::ShutDown,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Inventory(core) => core.into(),
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let not_found: CliError = CoreError::RouterNotFound { id: "R9".into() }.into();
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);

        let invalid: CliError = CoreError::InvalidInput {
            field: "neighbor_as".into(),
            reason: "must be 1-4294967295".into(),
        }
        .into();
        assert_eq!(invalid.exit_code(), exit_code::USAGE);

        let ping = CliError::PingFailed {
            from: "R1".into(),
            to: "R2".into(),
        };
        assert_eq!(ping.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn inventory_errors_unwrap_to_core_mapping() {
        let err: CliError = ConfigError::Inventory(CoreError::DuplicateRouter { id: "R1".into() }).into();
        assert!(matches!(err, CliError::DuplicateRouter { ref id } if id == "R1"));
    }
}
