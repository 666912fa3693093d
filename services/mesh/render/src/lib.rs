//! Route diagram rendering, render targets, and the route-table pipeline for meshmap.
//!
//! A [`RouteDiagram`] owns the topology graph of one drawing surface. Each
//! routing-table response runs decode, graph rebuild, layering, and rendering
//! as a single step, and the resulting [`Scene`] is handed to a caller-owned
//! [`RenderTarget`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagram;
pub mod error;
pub mod renderer;
pub mod scene;
pub mod svg;
pub mod target;

pub use diagram::{DiagramOutcome, DiagramState, RouteDiagram};
pub use error::{DiagramError, RenderError};
pub use renderer::{DiagramRenderer, Theme, PLACEHOLDER_TEXT};
pub use scene::{DirectedLine, Label, NodeBadge, Placeholder, Primitive, Scene};
pub use svg::to_svg;
pub use target::{OutputFormat, RenderTarget, SvgBuffer, SvgFile};
