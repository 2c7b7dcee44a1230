// ── Router domain types ──

use std::fmt;
use std::net::IpAddr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::status::{LinkState, RouterStatus};

/// Interfaces every router carries when the inventory does not list any.
pub const DEFAULT_INTERFACES: [&str; 3] = ["Gig0/0", "Gig0/1", "Gig0/2"];

/// A simulated network router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    pub id: String,
    pub ip: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub status: RouterStatus,
    #[serde(default = "default_interfaces")]
    pub interfaces: IndexMap<String, LinkState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgp: Option<BgpNeighbor>,
}

impl Router {
    pub fn new(
        id: impl Into<String>,
        ip: impl Into<String>,
        port: u16,
        status: impl Into<RouterStatus>,
    ) -> Self {
        Self {
            id: id.into(),
            ip: ip.into(),
            port,
            status: status.into(),
            interfaces: default_interfaces(),
            bgp: None,
        }
    }

    /// Display address, `ip:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    /// Interface names in declaration order.
    pub fn interface_names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.keys().map(String::as_str)
    }
}

/// Configured BGP neighbour of a router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpNeighbor {
    pub neighbor_ip: IpAddr,
    pub neighbor_as: u32,
}

impl fmt::Display for BgpNeighbor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AS{}", self.neighbor_ip, self.neighbor_as)
    }
}

fn default_interfaces() -> IndexMap<String, LinkState> {
    DEFAULT_INTERFACES
        .iter()
        .map(|name| ((*name).to_owned(), LinkState::Down))
        .collect()
}

/// Inventories written by hand mix `"port": 22` and `"port": "22"`.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortRepr {
        Number(u16),
        Text(String),
    }

    match PortRepr::deserialize(deserializer)? {
        PortRepr::Number(port) => Ok(port),
        PortRepr::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port: {text:?}"))),
    }
}
