//! Grayscale single-octave noise preview.

use image::GrayImage;
use rayon::prelude::*;

use crate::noise::GradientNoiseGenerator;

/// Options for the raw noise preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewOptions {
    pub width: u32,
    pub height: u32,
    /// Pixels per noise unit.
    pub scale: f64,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            scale: 20.0,
        }
    }
}

/// Maps a noise sample in [-1, 1] to a gray level.
fn gray_level(n: f64) -> u8 {
    ((n + 1.0) * 128.0).floor().clamp(0.0, 255.0) as u8
}

/// Renders one raw noise sample per pixel at `(px / scale, py / scale)`.
pub fn render_noise_preview(noise: &GradientNoiseGenerator, options: &PreviewOptions) -> GrayImage {
    let mut image = GrayImage::new(options.width, options.height);
    let width = options.width as usize;
    if width == 0 {
        return image;
    }

    let pixels: &mut [u8] = &mut image;
    pixels.par_chunks_mut(width).enumerate().for_each(|(py, row)| {
        let y = py as f64 / options.scale;
        for (px, value) in row.iter_mut().enumerate() {
            *value = gray_level(noise.sample(px as f64 / options.scale, y));
        }
    });
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_level_mapping() {
        assert_eq!(gray_level(-1.0), 0);
        assert_eq!(gray_level(0.0), 128);
        assert_eq!(gray_level(0.5), 192);
        assert_eq!(gray_level(1.0), 255);
    }

    #[test]
    fn preview_matches_samples() {
        let noise = GradientNoiseGenerator::from_seed(21);
        let options = PreviewOptions {
            width: 40,
            height: 30,
            scale: 20.0,
        };
        let image = render_noise_preview(&noise, &options);
        assert_eq!(image.dimensions(), (40, 30));
        for (px, py, p) in image.enumerate_pixels() {
            let expected = gray_level(noise.sample(px as f64 / 20.0, py as f64 / 20.0));
            assert_eq!(p.0[0], expected);
        }
    }

    #[test]
    fn preview_origin_is_mid_gray() {
        let noise = GradientNoiseGenerator::from_seed(22);
        let image = render_noise_preview(&noise, &PreviewOptions::default());
        assert_eq!(image.get_pixel(0, 0).0[0], 128);
    }

    #[test]
    fn empty_preview() {
        let noise = GradientNoiseGenerator::from_seed(23);
        let options = PreviewOptions {
            width: 0,
            height: 10,
            ..Default::default()
        };
        assert_eq!(render_noise_preview(&noise, &options).dimensions(), (0, 10));
    }
}
