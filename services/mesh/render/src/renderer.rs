//! Layout-to-scene conversion.

use crate::scene::{DirectedLine, Label, NodeBadge, Placeholder, Primitive, Scene};
use meshmap_topology::{Layout, Node};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Message drawn while no route table has been received
pub const PLACEHOLDER_TEXT: &str = "Route data has not been received yet";

/// Edges shorter than this are not drawn
const MIN_EDGE_LENGTH: f64 = 0.001;

/// Colours and fonts of the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Coordinator fill
    pub root_fill: String,
    /// Coordinator outline
    pub root_stroke: String,
    /// Node fill
    pub node_fill: String,
    /// Node outline
    pub node_stroke: String,
    /// Circle outline width
    pub node_stroke_width: f64,
    /// Edge colour
    pub edge_stroke: String,
    /// Edge width
    pub edge_stroke_width: f64,
    /// Label font family
    pub font_family: String,
    /// Label font size in px
    pub font_size: f64,
    /// Label font weight
    pub font_weight: u16,
    /// Label colour
    pub label_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            root_fill: "#4d96ff".to_string(),
            root_stroke: "#1a73e8".to_string(),
            node_fill: "#ff6b6b".to_string(),
            node_stroke: "#ff3333".to_string(),
            node_stroke_width: 2.0,
            edge_stroke: "#888".to_string(),
            edge_stroke_width: 2.0,
            font_family: "Roboto, sans-serif".to_string(),
            font_size: 14.0,
            font_weight: 500,
            label_color: "#333".to_string(),
        }
    }
}

/// Turns a layout into a vector scene
#[derive(Debug, Clone, Default)]
pub struct DiagramRenderer {
    theme: Theme,
}

impl DiagramRenderer {
    /// Create a renderer with the given theme
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Theme in use
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Draw `layout`: edges first, then nodes on top
    pub fn render(&self, layout: &Layout) -> Scene {
        if layout.is_empty() {
            return self.placeholder(layout.width(), layout.height());
        }

        let mut scene = Scene::new(layout.width(), layout.height());
        let mut skipped = 0usize;

        for edge in layout.edges() {
            match (layout.node(edge.source), layout.node(edge.target)) {
                (Some(source), Some(target)) => {
                    if let Some(line) = self.line(source, target) {
                        scene.primitives.push(Primitive::DirectedLine(line));
                    }
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} edges with an endpoint outside the diagram", skipped);
        }

        for node in layout.nodes() {
            scene.primitives.push(Primitive::NodeBadge(self.badge(node)));
        }

        scene
    }

    /// Scene shown while there is no topology
    pub fn placeholder(&self, width: f64, height: f64) -> Scene {
        let mut scene = Scene::new(width, height);
        scene.primitives.push(Primitive::Placeholder(Placeholder {
            label: self.label(PLACEHOLDER_TEXT, width / 2.0, height / 2.0),
        }));
        scene
    }

    /// Line between the two circle outlines so the arrowhead stays visible
    fn line(&self, source: &Node, target: &Node) -> Option<DirectedLine> {
        let (dx, dy) = (target.x - source.x, target.y - source.y);
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < MIN_EDGE_LENGTH {
            return None;
        }

        let (ux, uy) = (dx / dist, dy / dist);
        let (start, end) = if dist > source.radius + target.radius {
            (source.radius, target.radius)
        } else {
            (0.0, 0.0)
        };

        Some(DirectedLine {
            source: source.address,
            target: target.address,
            x1: source.x + ux * start,
            y1: source.y + uy * start,
            x2: target.x - ux * end,
            y2: target.y - uy * end,
            stroke: self.theme.edge_stroke.clone(),
            stroke_width: self.theme.edge_stroke_width,
        })
    }

    fn badge(&self, node: &Node) -> NodeBadge {
        let root = node.is_root();
        let (fill, stroke) = if root {
            (&self.theme.root_fill, &self.theme.root_stroke)
        } else {
            (&self.theme.node_fill, &self.theme.node_stroke)
        };

        NodeBadge {
            address: node.address,
            root,
            cx: node.x,
            cy: node.y,
            r: node.radius,
            fill: fill.clone(),
            stroke: stroke.clone(),
            stroke_width: self.theme.node_stroke_width,
            label: self.label(&node.address.to_string(), node.x, node.y),
        }
    }

    fn label(&self, text: &str, x: f64, y: f64) -> Label {
        Label {
            text: text.to_string(),
            x,
            y,
            font_family: self.theme.font_family.clone(),
            font_size: self.theme.font_size,
            font_weight: self.theme.font_weight,
            color: self.theme.label_color.clone(),
        }
    }
}
