//! User-facing terrain settings with documented defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::brush::DeformationBrush;
use super::heightfield::PlaneExtent;
use crate::biomes::BiomePalette;
use crate::noise::OctaveConfig;

/// Largest accepted grid resolution (segments per edge).
pub const MAX_RESOLUTION: u32 = 4096;
/// Largest accepted minimap edge in pixels.
pub const MAX_MINIMAP_SIZE: u32 = 4096;
/// Largest accepted octave count.
pub const MAX_OCTAVES: i32 = 16;

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every value the surrounding UI supplies to the terrain core.
///
/// Missing fields take their defaults when deserialized; [`Self::sanitized`]
/// replaces values that would make synthesis meaningless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Fractal noise parameters.
    pub noise: OctaveConfig,
    /// Grid segments per edge; the mesh has `(resolution + 1)²` vertices.
    pub resolution: u32,
    /// Water level for biome classification.
    pub water_level: f32,
    /// World-space size of the terrain plane.
    pub extent: PlaneExtent,
    /// Brush used by interactive sculpting.
    pub brush: DeformationBrush,
    /// Minimap width in pixels.
    pub minimap_width: u32,
    /// Minimap height in pixels.
    pub minimap_height: u32,
    /// Band colours.
    pub palette: BiomePalette,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            noise: OctaveConfig::default(),
            resolution: 100,
            water_level: 0.0,
            extent: PlaneExtent::default(),
            brush: DeformationBrush::default(),
            minimap_width: 200,
            minimap_height: 200,
            palette: BiomePalette::default(),
        }
    }
}

impl TerrainSettings {
    /// Loads settings from a JSON file and sanitizes them.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses settings from JSON text and sanitizes them.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(text)?;
        Ok(settings.sanitized())
    }

    /// Serializes settings as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replaces out-of-range values with their defaults.
    ///
    /// Non-positive octave counts are kept as given: they are a valid
    /// request for flat terrain. Counts above [`MAX_OCTAVES`] fall back to
    /// the default. A non-positive brush radius is likewise kept and simply
    /// sculpts nothing.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let noise = &mut self.noise;
        let noise_defaults = defaults.noise;
        if !(noise.scale.is_finite() && noise.scale > 0.0) {
            tracing::warn!(scale = noise.scale, "invalid noise scale, using default");
            noise.scale = noise_defaults.scale;
        }
        if !noise.height_scale.is_finite() {
            tracing::warn!(height_scale = noise.height_scale, "invalid height scale, using default");
            noise.height_scale = noise_defaults.height_scale;
        }
        if noise.octaves > MAX_OCTAVES {
            tracing::warn!(octaves = noise.octaves, "too many octaves, using default");
            noise.octaves = noise_defaults.octaves;
        }
        if !(noise.persistence.is_finite() && noise.persistence >= 0.0) {
            tracing::warn!(persistence = noise.persistence, "invalid persistence, using default");
            noise.persistence = noise_defaults.persistence;
        }
        if !(noise.lacunarity.is_finite() && noise.lacunarity > 0.0) {
            tracing::warn!(lacunarity = noise.lacunarity, "invalid lacunarity, using default");
            noise.lacunarity = noise_defaults.lacunarity;
        }

        if self.resolution > MAX_RESOLUTION {
            tracing::warn!(resolution = self.resolution, "resolution too large, using default");
            self.resolution = defaults.resolution;
        }
        if !self.water_level.is_finite() {
            tracing::warn!("invalid water level, using default");
            self.water_level = defaults.water_level;
        }

        if !(self.extent.width.is_finite() && self.extent.width > 0.0) {
            tracing::warn!(width = self.extent.width, "invalid terrain width, using default");
            self.extent.width = defaults.extent.width;
        }
        if !(self.extent.depth.is_finite() && self.extent.depth > 0.0) {
            tracing::warn!(depth = self.extent.depth, "invalid terrain depth, using default");
            self.extent.depth = defaults.extent.depth;
        }

        if !self.brush.radius.is_finite() {
            self.brush.radius = defaults.brush.radius;
        }
        if !self.brush.strength.is_finite() {
            self.brush.strength = defaults.brush.strength;
        }

        if self.minimap_width > MAX_MINIMAP_SIZE {
            self.minimap_width = defaults.minimap_width;
        }
        if self.minimap_height > MAX_MINIMAP_SIZE {
            self.minimap_height = defaults.minimap_height;
        }

        self
    }
}
