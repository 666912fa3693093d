//! Hop-level assignment relative to the coordinator.
//!
//! Edges point from a node toward its next hop, so a node sits one level
//! below the earliest level containing any of its next hops. Levels are
//! filled by repeated scans of the edge list in insertion order; the first
//! scan that places nothing ends the search. Every scan places at least one
//! node, so cycles among non-root nodes cannot keep it running.

use crate::graph::TopologyGraph;
use meshmap_wire::Address;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Level membership for one graph snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelAssignment {
    /// `levels[0]` is level 1
    levels: Vec<Vec<Address>>,
    /// Reverse index: address -> level number
    #[serde(skip)]
    index: HashMap<Address, usize>,
    /// Edge-list scans performed, including the final empty one
    #[serde(skip)]
    iterations: usize,
}

impl LevelAssignment {
    /// Number of non-empty levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True when no node was placed
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Nodes of level `number` (1-based), in discovery order
    pub fn level(&self, number: usize) -> Option<&[Address]> {
        number
            .checked_sub(1)
            .and_then(|i| self.levels.get(i))
            .map(Vec::as_slice)
    }

    /// Level number of an address, if it was placed
    pub fn level_of(&self, address: Address) -> Option<usize> {
        self.index.get(&address).copied()
    }

    /// `(level number, nodes)` pairs from level 1 downward
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Address])> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, nodes)| (i + 1, nodes.as_slice()))
    }

    /// Total number of placed nodes
    pub fn placed(&self) -> usize {
        self.index.len()
    }

    /// Number of edge-list scans the assignment took
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    fn push_level(&mut self, nodes: Vec<Address>) {
        let number = self.levels.len() + 1;
        for address in &nodes {
            self.index.insert(*address, number);
        }
        self.levels.push(nodes);
    }
}

/// Assign every node reachable from the coordinator to a hop level
pub fn assign_levels(graph: &TopologyGraph) -> LevelAssignment {
    let root = Address::COORDINATOR;
    let mut assignment = LevelAssignment::default();

    // Level 1: direct children of the root
    let mut first = Vec::new();
    let mut seen = HashSet::new();
    for edge in graph.edges() {
        if edge.target == root && edge.source != root && seen.insert(edge.source) {
            first.push(edge.source);
        }
    }
    assignment.iterations = 1;

    if first.is_empty() {
        debug!("No nodes route directly to the coordinator");
        return assignment;
    }

    let mut placed: HashSet<Address> = first.iter().copied().collect();
    assignment.push_level(first);

    loop {
        assignment.iterations += 1;

        let mut current = Vec::new();
        let mut current_set = HashSet::new();

        for edge in graph.edges() {
            if edge.source == root || placed.contains(&edge.source) {
                continue;
            }
            if placed.contains(&edge.target) && current_set.insert(edge.source) {
                current.push(edge.source);
            }
        }

        if current.is_empty() {
            break;
        }

        placed.extend(current.iter().copied());
        assignment.push_level(current);
    }

    debug!(
        "Assigned {} nodes to {} levels in {} scans",
        assignment.placed(),
        assignment.len(),
        assignment.iterations
    );

    assignment
}
