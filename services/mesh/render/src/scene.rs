//! Vector scene primitives.

use meshmap_wire::Address;
use serde::Serialize;

/// A finished drawing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Drawing width
    pub width: f64,
    /// Drawing height
    pub height: f64,
    /// Primitives in paint order
    pub primitives: Vec<Primitive>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    /// Edge primitives
    pub fn lines(&self) -> impl Iterator<Item = &DirectedLine> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::DirectedLine(line) => Some(line),
            _ => None,
        })
    }

    /// Node primitives
    pub fn badges(&self) -> impl Iterator<Item = &NodeBadge> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::NodeBadge(badge) => Some(badge),
            _ => None,
        })
    }

    /// Whether this is the "no data" scene
    pub fn is_placeholder(&self) -> bool {
        self.primitives
            .iter()
            .any(|p| matches!(p, Primitive::Placeholder(_)))
    }
}

/// One drawable element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Edge with an arrowhead at the target end
    DirectedLine(DirectedLine),
    /// Node circle with its address label
    NodeBadge(NodeBadge),
    /// Message shown when there is nothing to draw
    Placeholder(Placeholder),
}

/// Line from a node toward its next hop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectedLine {
    /// Source node
    pub source: Address,
    /// Next-hop node
    pub target: Address,
    /// Start x
    pub x1: f64,
    /// Start y
    pub y1: f64,
    /// End x, where the arrowhead tip sits
    pub x2: f64,
    /// End y
    pub y2: f64,
    /// Stroke colour
    pub stroke: String,
    /// Stroke width
    pub stroke_width: f64,
}

/// Text drawn centred on a point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    /// Text content
    pub text: String,
    /// Anchor x
    pub x: f64,
    /// Anchor y
    pub y: f64,
    /// Font family
    pub font_family: String,
    /// Font size in px
    pub font_size: f64,
    /// Font weight
    pub font_weight: u16,
    /// Text colour
    pub color: String,
}

/// Circle with a centred address label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeBadge {
    /// Node address
    pub address: Address,
    /// Whether this is the coordinator
    pub root: bool,
    /// Centre x
    pub cx: f64,
    /// Centre y
    pub cy: f64,
    /// Radius
    pub r: f64,
    /// Fill colour
    pub fill: String,
    /// Outline colour
    pub stroke: String,
    /// Outline width
    pub stroke_width: f64,
    /// Address label
    pub label: Label,
}

/// "No data" message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    /// Message
    pub label: Label,
}
