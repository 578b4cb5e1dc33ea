//! Terrain module.
//!
//! Provides the heightfield grid, the sculpting brush, the settings that
//! drive synthesis and the [`Terrain`] session that keeps them consistent.

mod brush;
mod config;
mod heightfield;
mod session;

pub use brush::DeformationBrush;
pub use config::{ConfigError, TerrainSettings, MAX_MINIMAP_SIZE, MAX_OCTAVES, MAX_RESOLUTION};
pub use heightfield::{HeightVertex, HeightfieldBuffer, PlaneExtent};
pub use session::Terrain;
