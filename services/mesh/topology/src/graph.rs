//! Directed topology graph rebuilt from each route table.

use meshmap_wire::{Address, RouteEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Radius given to nodes when they are first added
pub const DEFAULT_NODE_RADIUS: f64 = 25.0;

/// A mesh node and its drawing position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node address
    pub address: Address,
    /// Horizontal centre
    pub x: f64,
    /// Vertical centre
    pub y: f64,
    /// Circle radius
    pub radius: f64,
}

impl Node {
    /// Create an unplaced node
    pub fn new(address: Address) -> Self {
        Self {
            address,
            x: 0.0,
            y: 0.0,
            radius: DEFAULT_NODE_RADIUS,
        }
    }

    /// Whether this node is the coordinator
    pub fn is_root(&self) -> bool {
        self.address.is_coordinator()
    }
}

/// "source reaches the network via target"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Reporting node
    pub source: Address,
    /// Next hop
    pub target: Address,
}

impl Edge {
    /// Create an edge
    pub fn new(source: Address, target: Address) -> Self {
        Self { source, target }
    }
}

/// Node map and edge list of one route-table snapshot
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    /// Nodes keyed by address
    nodes: HashMap<Address, Node>,
    /// First-insertion order of `nodes`
    order: Vec<Address>,
    /// Edges in insertion order, duplicates allowed
    edges: Vec<Edge>,
}

impl TopologyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from decoded route entries
    pub fn from_entries(entries: &[RouteEntry]) -> Self {
        let mut graph = Self::new();
        graph.rebuild_from(entries);
        graph
    }

    /// Drop every node and edge
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.edges.clear();
    }

    /// Add a node unless one with this address exists
    pub fn add_node(&mut self, address: Address) {
        if !self.nodes.contains_key(&address) {
            self.nodes.insert(address, Node::new(address));
            self.order.push(address);
        }
    }

    /// Append an edge; a self-loop is redirected to the coordinator
    pub fn add_edge(&mut self, source: Address, target: Address) {
        let target = if source == target {
            Address::COORDINATOR
        } else {
            target
        };
        self.edges.push(Edge::new(source, target));
    }

    /// Replace the whole graph with the coordinator plus one edge per entry
    pub fn rebuild_from(&mut self, entries: &[RouteEntry]) {
        self.reset();
        self.add_node(Address::COORDINATOR);

        for entry in entries {
            self.add_node(entry.node_address);
            self.add_node(entry.next_hop_address);
            self.add_edge(entry.node_address, entry.next_hop_address);
        }

        debug!(
            "Rebuilt topology graph: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
    }

    /// Look up a node
    pub fn node(&self, address: Address) -> Option<&Node> {
        self.nodes.get(&address)
    }

    /// Nodes in first-insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(move |address| self.nodes.get(address))
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether a node with this address exists
    pub fn contains(&self, address: Address) -> bool {
        self.nodes.contains_key(&address)
    }

    /// Number of distinct nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges, duplicates included
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when the graph has neither nodes nor edges
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(node: u16, next_hop: u16) -> RouteEntry {
        RouteEntry::new(Address(node), Address(next_hop))
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = TopologyGraph::new();
        graph.add_node(Address(0x0001));
        graph.add_node(Address(0x0001));

        assert_eq!(graph.node_count(), 1);
        let node = graph.node(Address(0x0001)).unwrap();
        assert_eq!((node.x, node.y), (0.0, 0.0));
        assert_eq!(node.radius, DEFAULT_NODE_RADIUS);
    }

    #[test]
    fn test_self_loop_becomes_root_edge() {
        let mut graph = TopologyGraph::new();
        graph.add_edge(Address(0x0005), Address(0x0005));

        assert_eq!(graph.edges(), &[Edge::new(Address(0x0005), Address::COORDINATOR)]);
        assert!(graph.edges().iter().all(|e| e.source != e.target));
    }

    #[test]
    fn test_add_edge_does_not_create_nodes() {
        let mut graph = TopologyGraph::new();
        graph.add_edge(Address(0x0001), Address(0x0002));

        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_rebuild_adds_root_and_both_endpoints() {
        let mut graph = TopologyGraph::new();
        graph.rebuild_from(&[entry(0x0201, 0x0403), entry(0x0011, 0x0011)]);

        let addresses: Vec<Address> = graph.nodes().map(|n| n.address).collect();
        assert_eq!(
            addresses,
            vec![
                Address::COORDINATOR,
                Address(0x0201),
                Address(0x0403),
                Address(0x0011)
            ]
        );
        assert_eq!(
            graph.edges(),
            &[
                Edge::new(Address(0x0201), Address(0x0403)),
                Edge::new(Address(0x0011), Address::COORDINATOR),
            ]
        );
    }

    #[test]
    fn test_duplicate_entries_collapse_nodes_but_keep_edges() {
        let graph = TopologyGraph::from_entries(&[entry(0x0001, 0x0001), entry(0x0001, 0x0001)]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_reset_always_yields_empty_graph() {
        let mut graph = TopologyGraph::new();
        graph.reset();
        assert!(graph.is_empty());

        graph.rebuild_from(&[entry(0x0001, 0x0001)]);
        assert!(!graph.is_empty());
        graph.reset();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.nodes().count(), 0);
    }

    #[test]
    fn test_rebuild_never_inherits_stale_nodes() {
        let mut graph = TopologyGraph::from_entries(&[entry(0x00AA, 0x00AA)]);
        graph.rebuild_from(&[entry(0x00BB, 0x00BB)]);

        assert!(!graph.contains(Address(0x00AA)));
        assert!(graph.contains(Address(0x00BB)));
        assert!(graph.contains(Address::COORDINATOR));
        assert_eq!(graph.edge_count(), 1);
    }
}
