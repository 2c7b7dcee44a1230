// ── Router status and indicator mapping ──

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Open-ended status label of a router.
///
/// The well-known labels are exposed as constructors, but any descriptive
/// string is valid -- inventories routinely carry labels like `"pending"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouterStatus(String);

impl RouterStatus {
    pub const CONNECTED: &'static str = "connected";
    pub const UNAUTHORIZED: &'static str = "unauthorized";
    pub const RESTARTING_SIM: &'static str = "restarting (sim)";
    pub const CONNECTED_SIM: &'static str = "connected (sim)";
    pub const UNAUTHORIZED_SIM: &'static str = "unauthorized (sim)";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn restarting_sim() -> Self {
        Self::new(Self::RESTARTING_SIM)
    }

    pub fn connected_sim() -> Self {
        Self::new(Self::CONNECTED_SIM)
    }

    pub fn unauthorized_sim() -> Self {
        Self::new(Self::UNAUTHORIZED_SIM)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the router counts as reachable for simulated pings.
    pub fn is_connected(&self) -> bool {
        self.0.starts_with(Self::CONNECTED)
    }

    pub fn indicator(&self) -> Indicator {
        Indicator::for_status(self.as_str())
    }
}

impl fmt::Display for RouterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouterStatus {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for RouterStatus {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Colour of the status dot shown next to a router.
///
/// Only the two exact labels `connected` and `unauthorized` are coloured;
/// simulated variants such as `connected (sim)` stay neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Green,
    Red,
    Neutral,
}

impl Indicator {
    pub fn for_status(status: &str) -> Self {
        match status {
            RouterStatus::CONNECTED => Self::Green,
            RouterStatus::UNAUTHORIZED => Self::Red,
            _ => Self::Neutral,
        }
    }
}

/// Administrative state of a router interface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Up,
    Down,
}

impl LinkState {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_is_green() {
        assert_eq!(Indicator::for_status("connected"), Indicator::Green);
    }

    #[test]
    fn unauthorized_is_red() {
        assert_eq!(Indicator::for_status("unauthorized"), Indicator::Red);
    }

    #[test]
    fn other_labels_are_neutral() {
        for label in [
            "pending",
            "connected (sim)",
            "restarting (sim)",
            "unauthorized (sim)",
            "Connected",
            "",
        ] {
            assert_eq!(Indicator::for_status(label), Indicator::Neutral, "{label}");
        }
    }

    #[test]
    fn simulated_connected_counts_as_reachable() {
        assert!(RouterStatus::connected_sim().is_connected());
        assert!(RouterStatus::new("connected").is_connected());
        assert!(!RouterStatus::restarting_sim().is_connected());
        assert!(!RouterStatus::unauthorized_sim().is_connected());
    }

    #[test]
    fn link_state_parses_and_toggles() {
        let state: LinkState = "UP".parse().expect("case-insensitive parse");
        assert_eq!(state, LinkState::Up);
        assert_eq!(state.toggled(), LinkState::Down);
        assert_eq!(LinkState::Down.to_string(), "down");
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let json = serde_json::to_string(&RouterStatus::restarting_sim()).expect("serialize");
        assert_eq!(json, "\"restarting (sim)\"");
    }
}
