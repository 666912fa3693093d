//! Drawing surfaces owned by the caller and handed to the pipeline per call.

use crate::error::RenderError;
use crate::scene::Scene;
use crate::svg::to_svg;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// A surface that displays scenes
pub trait RenderTarget {
    /// Opaque handle identifying this surface
    fn id(&self) -> &str;

    /// Replace whatever the surface shows with `scene`
    fn present(&mut self, scene: &Scene) -> Result<(), RenderError>;
}

/// Serialised form written by file targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone SVG document
    #[default]
    Svg,
    /// Scene primitives as JSON
    Json,
}

impl OutputFormat {
    /// Serialise a scene in this format
    pub fn encode(self, scene: &Scene) -> Result<String, RenderError> {
        match self {
            OutputFormat::Svg => to_svg(scene),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(scene)?),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Svg => write!(f, "svg"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// In-memory SVG surface
#[derive(Debug, Clone, Default)]
pub struct SvgBuffer {
    id: String,
    document: Option<String>,
    scene: Option<Scene>,
    presented: usize,
}

impl SvgBuffer {
    /// Create an empty surface
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Last presented SVG document
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Last presented scene
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Number of successful presents
    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl RenderTarget for SvgBuffer {
    fn id(&self) -> &str {
        &self.id
    }

    fn present(&mut self, scene: &Scene) -> Result<(), RenderError> {
        self.document = Some(to_svg(scene)?);
        self.scene = Some(scene.clone());
        self.presented += 1;
        Ok(())
    }
}

/// Surface backed by a file, rewritten on every present
#[derive(Debug, Clone)]
pub struct SvgFile {
    id: String,
    path: PathBuf,
    format: OutputFormat,
}

impl SvgFile {
    /// Create a file surface
    pub fn new<P: AsRef<Path>>(path: P, format: OutputFormat) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            id: path.display().to_string(),
            path,
            format,
        }
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl RenderTarget for SvgFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn present(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let contents = self.format.encode(scene)?;
        std::fs::write(&self.path, contents)?;
        debug!("Wrote {} diagram to {:?}", self.format, self.path);
        Ok(())
    }
}
