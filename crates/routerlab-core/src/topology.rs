// ── Network topology ──
//
// The lab is wired as a ring through the routers in inventory order, with
// the SDN controller hanging off the first router.

use std::sync::Arc;

use serde::Serialize;
use strum::Display;

use crate::model::Router;

/// Id of the controller node added to every topology.
pub const CONTROLLER_NODE: &str = "ODL";

/// Colour class of a topology node, derived from its status prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NodeTone {
    Up,
    Down,
    Transitional,
    Controller,
    Unknown,
}

impl NodeTone {
    pub fn for_status(status: &str) -> Self {
        if status.starts_with("connected") {
            Self::Up
        } else if status.starts_with("unauthorized") || status.starts_with("error") {
            Self::Down
        } else if status.starts_with("restarting") {
            Self::Transitional
        } else {
            Self::Unknown
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyNode {
    pub id: String,
    pub status: String,
    pub tone: NodeTone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Topology {
    pub nodes: Vec<TopologyNode>,
    pub edges: Vec<TopologyEdge>,
}

impl Topology {
    pub fn from_routers(routers: &[Arc<Router>]) -> Self {
        let mut nodes: Vec<TopologyNode> = routers
            .iter()
            .map(|r| TopologyNode {
                id: r.id.clone(),
                status: r.status.to_string(),
                tone: NodeTone::for_status(r.status.as_str()),
            })
            .collect();

        let ids: Vec<&str> = routers.iter().map(|r| r.id.as_str()).collect();
        let mut edges = Vec::new();
        match ids.as_slice() {
            [] | [_] => {}
            [a, b] => edges.push(edge(a, b)),
            _ => {
                for (i, from) in ids.iter().enumerate() {
                    if let Some(to) = ids.get((i + 1) % ids.len()) {
                        edges.push(edge(from, to));
                    }
                }
            }
        }

        if let Some(first) = ids.first() {
            nodes.push(TopologyNode {
                id: CONTROLLER_NODE.to_owned(),
                status: "controller".to_owned(),
                tone: NodeTone::Controller,
            });
            edges.push(edge(CONTROLLER_NODE, first));
        }

        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&TopologyNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Ids adjacent to `id`, in edge order.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter_map(|e| {
                if e.from == id {
                    Some(e.to.as_str())
                } else if e.to == id {
                    Some(e.from.as_str())
                } else {
                    None
                }
            })
            .collect()
    }
}

fn edge(from: &str, to: &str) -> TopologyEdge {
    TopologyEdge {
        from: from.to_owned(),
        to: to.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn routers(specs: &[(&str, &str)]) -> Vec<Arc<Router>> {
        specs
            .iter()
            .enumerate()
            .map(|(i, (id, status))| {
                Arc::new(Router::new(*id, format!("10.0.0.{}", i + 1), 22, *status))
            })
            .collect()
    }

    fn pairs(topology: &Topology) -> Vec<(&str, &str)> {
        topology
            .edges
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect()
    }

    #[test]
    fn three_routers_form_triangle_with_controller() {
        let topo = Topology::from_routers(&routers(&[
            ("R1", "connected"),
            ("R2", "restarting (sim)"),
            ("R3", "unauthorized (sim)"),
        ]));
        assert_eq!(
            pairs(&topo),
            [("R1", "R2"), ("R2", "R3"), ("R3", "R1"), ("ODL", "R1")]
        );
        assert_eq!(topo.nodes.len(), 4);
        assert_eq!(topo.node("R2").map(|n| n.tone), Some(NodeTone::Transitional));
        assert_eq!(topo.node("R3").map(|n| n.tone), Some(NodeTone::Down));
        assert_eq!(topo.node("ODL").map(|n| n.tone), Some(NodeTone::Controller));
        assert_eq!(topo.neighbors("R1"), ["R2", "R3", "ODL"]);
    }

    #[test]
    fn two_routers_share_one_link() {
        let topo = Topology::from_routers(&routers(&[("A", "pending"), ("B", "connected")]));
        assert_eq!(pairs(&topo), [("A", "B"), ("ODL", "A")]);
        assert_eq!(topo.node("A").map(|n| n.tone), Some(NodeTone::Unknown));
    }

    #[test]
    fn empty_inventory_has_no_controller() {
        let topo = Topology::from_routers(&[]);
        assert_eq!(topo, Topology::default());
    }

    #[test]
    fn tone_uses_status_prefix() {
        assert_eq!(NodeTone::for_status("connected (sim)"), NodeTone::Up);
        assert_eq!(NodeTone::for_status("error: timeout"), NodeTone::Down);
        assert_eq!(NodeTone::for_status("pending"), NodeTone::Unknown);
    }
}
