//! Band colours.

use serde::{Deserialize, Serialize};

use super::{classify, BiomeBand};

/// RGB colour per biome band.
///
/// Colours are presentation only; swapping them never changes which band a
/// height falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomePalette {
    pub deep_water: [u8; 3],
    pub shallow_water: [u8; 3],
    pub beach: [u8; 3],
    pub grassland: [u8; 3],
    pub low_mountains: [u8; 3],
    pub high_mountains: [u8; 3],
}

impl Default for BiomePalette {
    fn default() -> Self {
        Self {
            deep_water: [0x00, 0x44, 0x88],
            shallow_water: [0x00, 0x88, 0xcc],
            beach: [0xfa, 0xeb, 0xd7],
            grassland: [0x8f, 0xbc, 0x8f],
            low_mountains: [0xa9, 0xa9, 0xa9],
            high_mountains: [0xff, 0xff, 0xff],
        }
    }
}

impl BiomePalette {
    pub fn rgb(&self, band: BiomeBand) -> [u8; 3] {
        match band {
            BiomeBand::DeepWater => self.deep_water,
            BiomeBand::ShallowWater => self.shallow_water,
            BiomeBand::Beach => self.beach,
            BiomeBand::Grassland => self.grassland,
            BiomeBand::LowMountains => self.low_mountains,
            BiomeBand::HighMountains => self.high_mountains,
        }
    }

    /// Colour in [0, 1] per channel, as vertex colour buffers expect.
    pub fn rgb_f32(&self, band: BiomeBand) -> [f32; 3] {
        let [r, g, b] = self.rgb(band);
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    /// Classifies and colours in one step.
    pub fn color_for(&self, elevation: f32, water_level: f32) -> [u8; 3] {
        self.rgb(classify(elevation, water_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_colors_are_distinct() {
        let palette = BiomePalette::default();
        let colors: Vec<_> = BiomeBand::all().iter().map(|&b| palette.rgb(b)).collect();
        for i in 0..colors.len() {
            for j in (i + 1)..colors.len() {
                assert_ne!(colors[i], colors[j]);
            }
        }
    }

    #[test]
    fn float_colors_in_unit_range() {
        let palette = BiomePalette::default();
        for band in BiomeBand::all() {
            for c in palette.rgb_f32(band) {
                assert!((0.0..=1.0).contains(&c));
            }
        }
        assert_eq!(palette.rgb_f32(BiomeBand::HighMountains), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn color_for_uses_classification() {
        let palette = BiomePalette::default();
        assert_eq!(palette.color_for(-2.0, 0.0), [0, 68, 136]);
        assert_eq!(palette.color_for(10.0, 0.0), [143, 188, 143]);
    }

    #[test]
    fn partial_palette_keeps_defaults() {
        let palette: BiomePalette = serde_json::from_str(r#"{ "beach": [1, 2, 3] }"#).unwrap();
        assert_eq!(palette.beach, [1, 2, 3]);
        assert_eq!(palette.grassland, BiomePalette::default().grassland);
    }
}
