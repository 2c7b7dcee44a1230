//! All possible UI actions. Actions are the sole mechanism for state mutation.

use routerlab_core::{LogLine, RouterSnapshot};

use crate::screen::ScreenId;

/// An error toast shown over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data Events (from the store bridge) ───────────────────────
    RoutersUpdated(RouterSnapshot),
    LogAppended(LogLine),

    // ── Router Commands ───────────────────────────────────────────
    RequestConnect(String),
    RequestView(String),
    RequestRestart(String),
    RequestShowInterfaces(String),
    RequestToggleInterface { router: String, interface: String },
    RequestConfigureBgp {
        router: String,
        neighbor_ip: String,
        neighbor_as: String,
    },
    RequestPing { from: String, to: String },

    // ── Fleet Commands ────────────────────────────────────────────
    RequestConnectAll,
    RequestControllerFailure,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
