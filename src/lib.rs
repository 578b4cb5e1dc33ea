//! Procedural heightfield terrain synthesis.
//!
//! This crate builds terrain from 2D simplex noise summed over fractal
//! octaves, colours it into height bands relative to a water level, supports
//! brush sculpting of the resulting grid, and renders an independent
//! low-resolution minimap of the same noise pipeline.

pub mod biomes;
pub mod export;
pub mod minimap;
pub mod noise;
pub mod terrain;

pub use biomes::{classify, classify_f64, BiomeBand, BiomePalette};
pub use minimap::{MinimapRaster, MinimapRasterizer};
pub use noise::{fractal_elevation, GradientNoiseGenerator, OctaveConfig, PermutationTable};
pub use terrain::{
    DeformationBrush, HeightVertex, HeightfieldBuffer, PlaneExtent, Terrain, TerrainSettings,
};
