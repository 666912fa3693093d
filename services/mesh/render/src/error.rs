//! Render and pipeline errors.

use meshmap_wire::DecodeError;
use thiserror::Error;

/// Errors while serialising or presenting a scene
#[derive(Error, Debug)]
pub enum RenderError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// SVG formatting error
    #[error("SVG formatting failed")]
    Fmt(#[from] std::fmt::Error),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Output format name not recognised
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Pipeline errors; the diagram keeps its previous state on any of them
#[derive(Error, Debug)]
pub enum DiagramError {
    /// Route-table payload rejected
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Render target refused the scene
    #[error("render target failed: {0}")]
    Render(#[from] RenderError),
}
