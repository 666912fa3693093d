//! Canvas placement of levelled nodes.

use crate::error::GeometryError;
use crate::graph::{Edge, Node, TopologyGraph, DEFAULT_NODE_RADIUS};
use crate::levels::{assign_levels, LevelAssignment};
use meshmap_wire::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Fixed geometry used to place nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryPolicy {
    /// Drawing width
    pub canvas_width: f64,
    /// Minimum drawing height
    pub canvas_height: f64,
    /// Vertical centre of the coordinator
    pub root_y: f64,
    /// Coordinator radius
    pub root_radius: f64,
    /// Radius of every other node
    pub node_radius: f64,
    /// Vertical centre of level 1
    pub base_y: f64,
    /// Vertical distance between levels
    pub level_spacing: f64,
    /// Left and right margin of every level
    pub margin_x: f64,
}

impl Default for GeometryPolicy {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 500.0,
            root_y: 50.0,
            root_radius: 30.0,
            node_radius: DEFAULT_NODE_RADIUS,
            base_y: 100.0,
            level_spacing: 80.0,
            margin_x: 100.0,
        }
    }
}

impl GeometryPolicy {
    /// Reject geometry that would hide nodes or edges
    pub fn validate(&self) -> Result<(), GeometryError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("root_radius", self.root_radius),
            ("node_radius", self.node_radius),
            ("level_spacing", self.level_spacing),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GeometryError::NotPositive { name, value });
            }
        }

        for (name, value) in [
            ("root_y", self.root_y),
            ("base_y", self.base_y),
            ("margin_x", self.margin_x),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GeometryError::NotPositive { name, value });
            }
        }

        if self.node_radius > self.root_radius {
            return Err(GeometryError::NodeLargerThanRoot {
                node: self.node_radius,
                root: self.root_radius,
            });
        }

        if self.usable_width() <= 0.0 {
            return Err(GeometryError::NoUsableWidth {
                width: self.canvas_width,
                margin: self.margin_x,
            });
        }

        Ok(())
    }

    /// Horizontal span shared by the nodes of one level
    pub fn usable_width(&self) -> f64 {
        (self.canvas_width - 2.0 * self.margin_x).max(0.0)
    }

    /// Vertical centre of level `number` (1-based)
    pub fn level_y(&self, number: usize) -> f64 {
        self.base_y + number.saturating_sub(1) as f64 * self.level_spacing
    }

    /// Horizontal centre of the `index`-th of `count` nodes in a level
    pub fn level_x(&self, index: usize, count: usize) -> f64 {
        let gaps = count.saturating_sub(1).max(1) as f64;
        self.margin_x + index as f64 * (self.usable_width() / gaps)
    }
}

/// Positioned, read-only snapshot of a topology graph
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    /// Coordinator first, then each level left to right
    nodes: Vec<Node>,
    #[serde(skip)]
    index: HashMap<Address, usize>,
    edges: Vec<Edge>,
    levels: LevelAssignment,
    /// Nodes with no route to the coordinator
    unplaced: Vec<Address>,
    width: f64,
    height: f64,
}

impl Layout {
    /// Look up a placed node
    pub fn node(&self, address: Address) -> Option<&Node> {
        self.index.get(&address).map(|&i| &self.nodes[i])
    }

    /// Placed nodes, coordinator first
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every graph edge, including those touching unplaced nodes
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Level assignment the positions were computed from
    pub fn levels(&self) -> &LevelAssignment {
        &self.levels
    }

    /// Graph nodes left out of the diagram
    pub fn unplaced(&self) -> &[Address] {
        &self.unplaced
    }

    /// The coordinator, absent only for an empty graph
    pub fn root(&self) -> Option<&Node> {
        self.node(Address::COORDINATOR)
    }

    /// Scene width
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Scene height, grown to fit every level
    pub fn height(&self) -> f64 {
        self.height
    }

    /// True when nothing was placed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn place(&mut self, node: Node) {
        self.index.insert(node.address, self.nodes.len());
        self.nodes.push(node);
    }
}

/// Computes levels and coordinates for a topology graph
#[derive(Debug, Clone, Default)]
pub struct LayeringEngine {
    policy: GeometryPolicy,
}

impl LayeringEngine {
    /// Create an engine with the given geometry
    pub fn new(policy: GeometryPolicy) -> Self {
        Self { policy }
    }

    /// Geometry in use
    pub fn policy(&self) -> &GeometryPolicy {
        &self.policy
    }

    /// Lay out `graph` from scratch
    pub fn layout(&self, graph: &TopologyGraph) -> Layout {
        let policy = &self.policy;
        let levels = assign_levels(graph);

        let mut layout = Layout {
            edges: graph.edges().to_vec(),
            width: policy.canvas_width,
            height: policy.canvas_height,
            ..Layout::default()
        };

        if let Some(root) = graph.node(Address::COORDINATOR) {
            layout.place(Node {
                x: policy.canvas_width / 2.0,
                y: policy.root_y,
                radius: policy.root_radius,
                ..*root
            });
        }

        for (number, members) in levels.iter() {
            let y = policy.level_y(number);
            for (i, address) in members.iter().enumerate() {
                let Some(node) = graph.node(*address) else {
                    continue;
                };
                layout.place(Node {
                    x: policy.level_x(i, members.len()),
                    y,
                    radius: policy.node_radius,
                    ..*node
                });
            }
        }

        layout.unplaced = graph
            .nodes()
            .map(|n| n.address)
            .filter(|address| layout.node(*address).is_none())
            .collect();

        if !levels.is_empty() {
            let bottom = policy.level_y(levels.len()) + 2.0 * policy.node_radius;
            layout.height = layout.height.max(bottom);
        }

        if !layout.unplaced.is_empty() {
            debug!(
                "{} nodes have no route to the coordinator and are left out",
                layout.unplaced.len()
            );
        }

        layout.levels = levels;
        layout
    }
}
