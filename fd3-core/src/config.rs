/// Settings for building, exporting and viewing the model.
///
/// Every section falls back to its defaults field by field, so a config
/// file only needs the values it changes:
///
/// ```json
/// { "model": { "edge_radius": 0.15 }, "export": { "format": "ascii" } }
/// ```
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub export: ExportConfig,
    pub viewer: ViewerConfig,
}

impl Config {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Tessellation of the wire-frame solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Radius of the cylinder drawn for each edge.
    pub edge_radius: f64,
    /// Radius of the sphere drawn for each vertex.
    pub vertex_radius: f64,
    /// Facets around each cylinder.
    pub cylinder_segments: usize,
    /// Latitude bands of each sphere.
    pub sphere_stacks: usize,
    /// Longitude segments of each sphere.
    pub sphere_slices: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            edge_radius: 0.1,
            vertex_radius: 0.1,
            cylinder_segments: 12,
            sphere_stacks: 8,
            sphere_slices: 12,
        }
    }
}

/// STL encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Where and how the model is exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub path: PathBuf,
    pub format: StlFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fd3.stl"),
            format: StlFormat::Binary,
        }
    }
}

/// Which diagram the viewer opens with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartView {
    #[default]
    Hasse,
    Model,
}

/// Interactive viewer behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Target frame rate.
    pub fps: u32,
    /// Keep the model turning slowly when no key is pressed.
    pub auto_rotate: bool,
    pub start_view: StartView,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            auto_rotate: true,
            start_view: StartView::Hasse,
        }
    }
}
