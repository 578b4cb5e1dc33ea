//! Low-resolution overview raster.
//!
//! The minimap re-runs the noise and classification pipeline at its own
//! resolution instead of downsampling the mesh, so the two never need to
//! line up pixel-for-vertex.

mod preview;

pub use preview::{render_noise_preview, PreviewOptions};

use image::RgbaImage;
use rayon::prelude::*;

use crate::biomes::{classify_f64, BiomePalette};
use crate::noise::{fractal_elevation, GradientNoiseGenerator, OctaveConfig};
use crate::terrain::PlaneExtent;

/// RGBA8 overview image. Every pixel is fully opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapRaster {
    image: RgbaImage,
}

impl MinimapRaster {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA at pixel `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Row-major RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Renders the biome overview at a fixed pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapRasterizer {
    pub width: u32,
    pub height: u32,
    pub extent: PlaneExtent,
    pub palette: BiomePalette,
}

impl Default for MinimapRasterizer {
    fn default() -> Self {
        Self::new(200, 200, PlaneExtent::default())
    }
}

impl MinimapRasterizer {
    pub fn new(width: u32, height: u32, extent: PlaneExtent) -> Self {
        Self {
            width,
            height,
            extent,
            palette: BiomePalette::default(),
        }
    }

    pub fn with_palette(mut self, palette: BiomePalette) -> Self {
        self.palette = palette;
        self
    }

    /// World coordinate sampled for pixel `(px, py)`.
    ///
    /// Pixel `(0, 0)` maps to `(-width / 2, -depth / 2)`; the far edge is
    /// not sampled.
    pub fn world_coords(&self, px: u32, py: u32) -> (f64, f64) {
        let tw = self.extent.width as f64;
        let td = self.extent.depth as f64;
        let x = px as f64 / self.width as f64 * tw - tw / 2.0;
        let y = py as f64 / self.height as f64 * td - td / 2.0;
        (x, y)
    }

    /// Samples, classifies and colours every pixel.
    ///
    /// Elevations are classified at full `f64` precision, without the `f32`
    /// rounding grid vertices go through.
    pub fn render(
        &self,
        noise: &GradientNoiseGenerator,
        config: &OctaveConfig,
        water_level: f32,
    ) -> MinimapRaster {
        let mut image = RgbaImage::new(self.width, self.height);
        let width = self.width as usize;

        if width > 0 {
            let pixels: &mut [u8] = &mut image;
            pixels.par_chunks_mut(4).enumerate().for_each(|(i, px)| {
                let (x, y) = self.world_coords((i % width) as u32, (i / width) as u32);
                let h = fractal_elevation(noise, x, y, config);
                let [r, g, b] = self.palette.rgb(classify_f64(h, water_level as f64));
                px.copy_from_slice(&[r, g, b, 255]);
            });
        }

        tracing::debug!(width = self.width, height = self.height, "minimap rendered");
        MinimapRaster { image }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_match_request() {
        let noise = GradientNoiseGenerator::from_seed(11);
        for (w, h) in [(200, 200), (64, 16), (1, 1), (0, 0), (0, 5), (7, 0)] {
            let raster = MinimapRasterizer::new(w, h, PlaneExtent::default()).render(
                &noise,
                &OctaveConfig::default(),
                0.0,
            );
            assert_eq!((raster.width(), raster.height()), (w, h));
            assert_eq!(raster.as_raw().len(), (w * h * 4) as usize);
        }
    }

    #[test]
    fn test_pixels_are_opaque_and_classified() {
        let noise = GradientNoiseGenerator::from_seed(12);
        let config = OctaveConfig::default();
        let rasterizer = MinimapRasterizer::new(32, 24, PlaneExtent::default());
        let raster = rasterizer.render(&noise, &config, 0.5);

        for py in 0..24 {
            for px in 0..32 {
                let [r, g, b, a] = raster.pixel(px, py).unwrap();
                assert_eq!(a, 255);
                let (x, y) = rasterizer.world_coords(px, py);
                let h = fractal_elevation(&noise, x, y, &config);
                assert_eq!([r, g, b], rasterizer.palette.rgb(classify_f64(h, 0.5)));
            }
        }
        assert_eq!(raster.pixel(32, 0), None);
    }

    #[test]
    fn test_world_coords_span_extent() {
        let rasterizer = MinimapRasterizer::new(200, 100, PlaneExtent::default());
        assert_eq!(rasterizer.world_coords(0, 0), (-100.0, -100.0));
        assert_eq!(rasterizer.world_coords(100, 50), (0.0, 0.0));
        let (x, y) = rasterizer.world_coords(199, 99);
        assert!((x - 99.0).abs() < 1e-9 && (y - 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_high_water_floods_everything() {
        let noise = GradientNoiseGenerator::from_seed(13);
        let rasterizer = MinimapRasterizer::default();
        let raster = rasterizer.render(&noise, &OctaveConfig::default(), 100.0);
        let deep = rasterizer.palette.deep_water;
        assert!(raster
            .as_raw()
            .chunks(4)
            .all(|px| px[..3] == deep[..] && px[3] == 255));
    }
}
