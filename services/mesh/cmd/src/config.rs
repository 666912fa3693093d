//! Configuration handling for the meshmap console.
//!
//! Settings come from a YAML file and are then overridden by environment
//! variables. A missing or unreadable file falls back to the defaults; geometry
//! that would hide nodes or edges is rejected.

use anyhow::{Context, Result};
use meshmap_render::{OutputFormat, Theme};
use meshmap_topology::GeometryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Console configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshMapConfig {
    /// Node placement
    pub geometry: GeometryPolicy,
    /// Colours and fonts
    pub theme: Theme,
    /// Where the diagram goes
    pub output: OutputConfig,
}

/// Diagram output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file
    pub path: PathBuf,
    /// Output format
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("route_map.svg"),
            format: OutputFormat::Svg,
        }
    }
}

/// Root configuration structure (matches the YAML structure)
#[derive(Debug, Deserialize)]
struct RootConfig {
    services: Option<ServicesConfig>,
}

#[derive(Debug, Deserialize)]
struct ServicesConfig {
    meshmap: Option<MeshMapConfig>,
}

impl MeshMapConfig {
    /// Load configuration from file and environment variables
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config = Self::default();

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match serde_yaml::from_str::<RootConfig>(&content) {
                Ok(root) => {
                    if let Some(section) = root.services.and_then(|s| s.meshmap) {
                        config = section;
                    }
                    info!("Loaded configuration from {:?}", config_path.as_ref());
                }
                Err(e) => {
                    warn!(
                        "Failed to parse config file {:?} ({}), using defaults",
                        config_path.as_ref(),
                        e
                    );
                }
            },
            Err(_) => {
                warn!("Config file {:?} not found, using defaults", config_path.as_ref());
            }
        }

        config.apply_environment_overrides();

        config
            .geometry
            .validate()
            .context("invalid geometry configuration")?;

        info!(
            "Final meshmap configuration: canvas={}x{}, level_spacing={}, output={:?} ({})",
            config.geometry.canvas_width,
            config.geometry.canvas_height,
            config.geometry.level_spacing,
            config.output.path,
            config.output.format
        );

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_environment_overrides(&mut self) {
        if let Some(width) = env_f64("MESHMAP_CANVAS_WIDTH") {
            self.geometry.canvas_width = width;
            info!("Canvas width overridden by environment: {}", width);
        }

        if let Some(height) = env_f64("MESHMAP_CANVAS_HEIGHT") {
            self.geometry.canvas_height = height;
            info!("Canvas height overridden by environment: {}", height);
        }

        if let Some(spacing) = env_f64("MESHMAP_LEVEL_SPACING") {
            self.geometry.level_spacing = spacing;
            info!("Level spacing overridden by environment: {}", spacing);
        }

        if let Ok(path) = std::env::var("MESHMAP_OUTPUT") {
            self.output.path = PathBuf::from(path);
            info!("Output path overridden by environment: {:?}", self.output.path);
        }
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
}
