//! Topology error types.

use thiserror::Error;

/// Geometry that cannot produce a readable diagram
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Dimension is zero, negative, or not finite
    #[error("{name} must be a positive number, got {value}")]
    NotPositive {
        /// Policy field
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Nodes would be drawn larger than the coordinator
    #[error("node radius {node} exceeds root radius {root}")]
    NodeLargerThanRoot {
        /// Configured node radius
        node: f64,
        /// Configured root radius
        root: f64,
    },

    /// Margins leave no room to spread a level
    #[error("canvas width {width} leaves no room inside margins of {margin}")]
    NoUsableWidth {
        /// Configured canvas width
        width: f64,
        /// Configured left/right margin
        margin: f64,
    },
}
