// ── Core error types ──
//
// User-facing errors from routerlab-core. Every simulated action that
// names a router or interface resolves it through the store first, so
// lookups fail here rather than deep inside a render.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Router not found: {id}")]
    RouterNotFound { id: String },

    #[error("Interface {interface} not found on router {id}")]
    InterfaceNotFound { id: String, interface: String },

    // ── Inventory errors ─────────────────────────────────────────────
    #[error("Duplicate router id: {id}")]
    DuplicateRouter { id: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Simulator is shut down")]
    ShutDown,
}

impl CoreError {
    pub(crate) fn not_found(id: &str) -> Self {
        Self::RouterNotFound { id: id.to_owned() }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }
}
