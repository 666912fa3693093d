//! Route-table topology graph, hop-level layering, and diagram geometry for meshmap.
//!
//! This crate turns decoded route entries into a directed graph whose edges point
//! from a node toward its next hop, assigns every node reachable from the
//! coordinator to a hop level, and places the result on a 2-D canvas.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod graph;
pub mod layout;
pub mod levels;

pub use error::GeometryError;
pub use graph::{Edge, Node, TopologyGraph, DEFAULT_NODE_RADIUS};
pub use layout::{GeometryPolicy, LayeringEngine, Layout};
pub use levels::{assign_levels, LevelAssignment};
