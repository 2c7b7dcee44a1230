//! Screen identifiers.

use std::fmt;

/// Primary TUI screens, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Routers, // 1
    Topology, // 2
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 2] = [Self::Routers, Self::Topology];

    pub fn number(self) -> u8 {
        match self {
            Self::Routers => 1,
            Self::Topology => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Routers),
            2 => Some(Self::Topology),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        match self {
            Self::Routers => Self::Topology,
            Self::Topology => Self::Routers,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Routers => "Routers",
            Self::Topology => "Topology",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
