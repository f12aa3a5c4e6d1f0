//! Companion map metadata.
//!
//! Maps ship as a raster image plus a YAML record in the usual occupancy-map
//! layout:
//!
//! ```yaml
//! image: office.pgm
//! resolution: 0.05
//! origin: [-12.2, -8.4, 0.0]
//! annotations: office.svg   # optional
//! ```
//!
//! Reading the raster itself is left to the caller, who fills in the pixel
//! size with [`MapMetadata::with_dimensions`].

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("resolution must be a positive number, got {0}")]
    InvalidResolution(f64),

    #[error("origin must have 2 or 3 components, got {0}")]
    InvalidOrigin(usize),
}

/// Pixel size of the map raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMetadata {
    /// Map name, taken from the metadata file name.
    #[serde(skip)]
    pub name: String,

    pub image: String,

    /// Meters per pixel.
    pub resolution: f64,

    /// World pose of the lower-left pixel: `[x, y]` or `[x, y, yaw]`.
    pub origin: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negate: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupied_thresh: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_thresh: Option<f64>,

    #[serde(skip)]
    pub dimensions: Option<MapDimensions>,
}

impl MapMetadata {
    pub fn from_yaml(name: impl Into<String>, yaml: &str) -> Result<Self, MetadataError> {
        let mut metadata: MapMetadata = serde_yaml::from_str(yaml)?;
        if !metadata.resolution.is_finite() || metadata.resolution <= 0.0 {
            return Err(MetadataError::InvalidResolution(metadata.resolution));
        }
        if !(2..=3).contains(&metadata.origin.len()) {
            return Err(MetadataError::InvalidOrigin(metadata.origin.len()));
        }
        metadata.name = name.into();
        Ok(metadata)
    }

    /// Load a metadata file. The map is named after the file, up to its first dot.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let yaml = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .and_then(|f| f.to_str())
            .and_then(|f| f.split('.').next())
            .unwrap_or_default();
        Self::from_yaml(name, &yaml)
    }

    pub fn with_dimensions(mut self, dimensions: MapDimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn dimensions(&self) -> Option<MapDimensions> {
        self.dimensions
    }

    /// World position of the map origin, ignoring any yaw component.
    pub fn origin_xy(&self) -> (f64, f64) {
        (
            self.origin.first().copied().unwrap_or(0.0),
            self.origin.get(1).copied().unwrap_or(0.0),
        )
    }
}
