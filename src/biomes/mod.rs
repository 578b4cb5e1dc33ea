//! Height-band biome classification relative to a water level.
//!
//! Six ordered bands; the first two are measured from the water level, the
//! rest use fixed elevation thresholds. The first matching band wins.

mod palette;

pub use palette::BiomePalette;

use serde::{Deserialize, Serialize};

/// Elevation below which land is still beach (exclusive).
pub const BEACH_MAX: f32 = 5.0;
/// Elevation below which land is grassland (exclusive).
pub const GRASSLAND_MAX: f32 = 15.0;
/// Elevation below which land is low mountains (exclusive).
pub const LOW_MOUNTAINS_MAX: f32 = 25.0;
/// Depth of the shallow-water band above the water level.
pub const SHALLOW_WATER_DEPTH: f32 = 1.0;

/// Biome band ID. `as_u8()` is stable and used for storage/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BiomeBand {
    DeepWater = 0,
    ShallowWater = 1,
    Beach = 2,
    Grassland = 3,
    LowMountains = 4,
    HighMountains = 5,
}

impl BiomeBand {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// All bands in classification order.
    pub fn all() -> [BiomeBand; 6] {
        [
            BiomeBand::DeepWater,
            BiomeBand::ShallowWater,
            BiomeBand::Beach,
            BiomeBand::Grassland,
            BiomeBand::LowMountains,
            BiomeBand::HighMountains,
        ]
    }

    pub fn is_water(self) -> bool {
        matches!(self, BiomeBand::DeepWater | BiomeBand::ShallowWater)
    }

    pub fn name(self) -> &'static str {
        match self {
            BiomeBand::DeepWater => "deep water",
            BiomeBand::ShallowWater => "shallow water",
            BiomeBand::Beach => "beach",
            BiomeBand::Grassland => "grassland",
            BiomeBand::LowMountains => "low mountains",
            BiomeBand::HighMountains => "high mountains",
        }
    }
}

/// Classifies an elevation against the current water level.
///
/// Thresholds are exclusive upper bounds. NaN elevations fall through to
/// [`BiomeBand::HighMountains`].
pub fn classify(elevation: f32, water_level: f32) -> BiomeBand {
    classify_f64(elevation as f64, water_level as f64)
}

/// [`classify`] for unrounded elevations straight from the noise sum.
///
/// Comparisons run in `f64`, so a sample just below a threshold stays in the
/// lower band even when it would round up to the threshold as `f32`.
pub fn classify_f64(elevation: f64, water_level: f64) -> BiomeBand {
    if elevation < water_level {
        BiomeBand::DeepWater
    } else if elevation < water_level + SHALLOW_WATER_DEPTH as f64 {
        BiomeBand::ShallowWater
    } else if elevation < BEACH_MAX as f64 {
        BiomeBand::Beach
    } else if elevation < GRASSLAND_MAX as f64 {
        BiomeBand::Grassland
    } else if elevation < LOW_MOUNTAINS_MAX as f64 {
        BiomeBand::LowMountains
    } else {
        BiomeBand::HighMountains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_at_sea_level() {
        assert_eq!(classify(-1.0, 0.0), BiomeBand::DeepWater);
        assert_eq!(classify(0.5, 0.0), BiomeBand::ShallowWater);
        assert_eq!(classify(4.9, 0.0), BiomeBand::Beach);
        assert_eq!(classify(14.9, 0.0), BiomeBand::Grassland);
        assert_eq!(classify(24.9, 0.0), BiomeBand::LowMountains);
        assert_eq!(classify(30.0, 0.0), BiomeBand::HighMountains);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(classify(0.0, 0.0), BiomeBand::ShallowWater);
        assert_eq!(classify(1.0, 0.0), BiomeBand::Beach);
        assert_eq!(classify(5.0, 0.0), BiomeBand::Grassland);
        assert_eq!(classify(15.0, 0.0), BiomeBand::LowMountains);
        assert_eq!(classify(25.0, 0.0), BiomeBand::HighMountains);
    }

    #[test]
    fn water_bands_follow_water_level() {
        // Raised water swallows what would otherwise be grassland.
        assert_eq!(classify(9.0, 10.0), BiomeBand::DeepWater);
        assert_eq!(classify(10.5, 10.0), BiomeBand::ShallowWater);
        assert_eq!(classify(11.0, 10.0), BiomeBand::Grassland);
        // Lowered water exposes beach below zero.
        assert_eq!(classify(-3.0, -5.0), BiomeBand::Beach);
    }

    #[test]
    fn high_water_skips_land_bands() {
        assert_eq!(classify(26.0, 30.0), BiomeBand::DeepWater);
        assert_eq!(classify(30.2, 30.0), BiomeBand::ShallowWater);
        assert_eq!(classify(31.0, 30.0), BiomeBand::HighMountains);
    }

    #[test]
    fn classification_is_monotonic_in_elevation() {
        for water in [-4.0f32, 0.0, 2.5, 12.0] {
            let mut prev = BiomeBand::DeepWater;
            let mut h = -20.0f32;
            while h < 40.0 {
                let band = classify(h, water);
                assert!(band >= prev, "band regressed at h={} water={}", h, water);
                prev = band;
                h += 0.25;
            }
        }
    }

    #[test]
    fn nan_is_total() {
        assert_eq!(classify(f32::NAN, 0.0), BiomeBand::HighMountains);
        assert_eq!(classify_f64(f64::NAN, 0.0), BiomeBand::HighMountains);
    }

    #[test]
    fn f64_elevations_keep_their_band_near_thresholds() {
        for threshold in [BEACH_MAX, GRASSLAND_MAX, LOW_MOUNTAINS_MAX] {
            let below = threshold as f64 - 1e-9;
            // Rounds up onto the threshold in f32.
            assert_eq!(below as f32, threshold);
            assert!(classify_f64(below, 0.0) < classify(below as f32, 0.0));
            assert_eq!(classify_f64(threshold as f64, 0.0), classify(threshold, 0.0));
        }
        assert_eq!(classify_f64(1.0 - 1e-12, 0.0), BiomeBand::ShallowWater);
        assert_eq!(classify(1.0, 0.0), BiomeBand::Beach);
    }
}
