//! PNG export for heightmaps, minimaps and noise previews.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{GrayImage, ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::minimap::MinimapRaster;
use crate::terrain::HeightfieldBuffer;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
    #[error("Nothing to export: image is {0}x{1}")]
    EmptyImage(u32, u32),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Elevation mapped to black.
    pub min_height: f32,
    /// Elevation mapped to white.
    pub max_height: f32,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: -10.0,
            max_height: 30.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options spanning the buffer's current elevation range.
    ///
    /// A flat buffer gets a unit range so export still succeeds.
    pub fn auto_range(buffer: &HeightfieldBuffer) -> Self {
        let (min, max) = buffer.height_range();
        let max = if max > min { max } else { min + 1.0 };
        Self {
            min_height: min,
            max_height: max,
            ..Default::default()
        }
    }
}

fn encode(
    path: &Path,
    bytes: &[u8],
    width: u32,
    height: u32,
    color: image::ExtendedColorType,
    compression: CompressionType,
    filter: FilterType,
) -> Result<(), PngExportError> {
    if width == 0 || height == 0 {
        return Err(PngExportError::EmptyImage(width, height));
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, compression, filter);
    encoder.write_image(bytes, width, height, color)?;
    Ok(())
}

/// Exports grid elevations as a 16-bit grayscale PNG, one pixel per vertex.
///
/// Row 0 of the image is grid row 0 (the far edge).
pub fn export_heightmap_png(
    buffer: &HeightfieldBuffer,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let min = options.min_height;
    let max = options.max_height;
    if !(min < max) {
        return Err(PngExportError::InvalidHeightRange(min, max));
    }

    let side = buffer.row_len();
    let range = max - min;
    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(side, side);

    for (pixel, vertex) in img.pixels_mut().zip(buffer.vertices()) {
        let normalized = ((vertex.z - min) / range).clamp(0.0, 1.0);
        *pixel = Luma([(normalized * 65535.0) as u16]);
    }

    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encode(
        path,
        byte_slice,
        side,
        side,
        image::ExtendedColorType::L16,
        options.compression,
        options.filter,
    )
}

/// Exports the minimap as an RGBA8 PNG.
pub fn export_minimap_png(raster: &MinimapRaster, path: &Path) -> Result<(), PngExportError> {
    encode(
        path,
        raster.as_raw(),
        raster.width(),
        raster.height(),
        image::ExtendedColorType::Rgba8,
        CompressionType::Default,
        FilterType::Adaptive,
    )
}

/// Exports a grayscale noise preview as an 8-bit PNG.
pub fn export_preview_png(preview: &GrayImage, path: &Path) -> Result<(), PngExportError> {
    encode(
        path,
        preview.as_raw(),
        preview.width(),
        preview.height(),
        image::ExtendedColorType::L8,
        CompressionType::Default,
        FilterType::Adaptive,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::BiomePalette;
    use crate::minimap::{render_noise_preview, MinimapRasterizer, PreviewOptions};
    use crate::noise::{GradientNoiseGenerator, OctaveConfig};
    use crate::terrain::PlaneExtent;
    use image::GenericImageView;
    use tempfile::tempdir;

    fn buffer(resolution: u32) -> HeightfieldBuffer {
        HeightfieldBuffer::generate(
            &GradientNoiseGenerator::from_seed(42),
            resolution,
            PlaneExtent::default(),
            &OctaveConfig::default(),
            0.0,
            BiomePalette::default(),
        )
    }

    #[test]
    fn test_export_heightmap_png() {
        let buffer = buffer(31);
        let dir = tempdir().unwrap();
        let path = dir.path().join("height.png");

        export_heightmap_png(&buffer, &path, &PngExportOptions::auto_range(&buffer)).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.dimensions(), (32, 32));
        let l16 = img.to_luma16();
        let min = l16.pixels().map(|p| p.0[0]).min().unwrap();
        let max = l16.pixels().map(|p| p.0[0]).max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 65535);
    }

    #[test]
    fn test_invalid_height_range() {
        let buffer = buffer(4);
        let dir = tempdir().unwrap();
        let options = PngExportOptions {
            min_height: 1.0,
            max_height: -1.0,
            ..Default::default()
        };
        let result = export_heightmap_png(&buffer, &dir.path().join("h.png"), &options);
        assert!(matches!(result, Err(PngExportError::InvalidHeightRange(_, _))));
    }

    #[test]
    fn test_empty_heightfield_is_rejected() {
        let buffer = buffer(0);
        let dir = tempdir().unwrap();
        let result = export_heightmap_png(&buffer, &dir.path().join("h.png"), &PngExportOptions::default());
        assert!(matches!(result, Err(PngExportError::EmptyImage(0, 0))));
    }

    #[test]
    fn test_export_minimap_png() {
        let noise = GradientNoiseGenerator::from_seed(3);
        let raster = MinimapRasterizer::new(48, 24, PlaneExtent::default()).render(
            &noise,
            &OctaveConfig::default(),
            0.0,
        );
        let dir = tempdir().unwrap();
        let path = dir.path().join("minimap.png");
        export_minimap_png(&raster, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (48, 24));
        assert_eq!(img.as_raw(), raster.as_raw());
    }

    #[test]
    fn test_export_preview_png() {
        let noise = GradientNoiseGenerator::from_seed(4);
        let preview = render_noise_preview(
            &noise,
            &PreviewOptions {
                width: 20,
                height: 10,
                scale: 5.0,
            },
        );
        let dir = tempdir().unwrap();
        let path = dir.path().join("preview.png");
        export_preview_png(&preview, &path).unwrap();
        assert_eq!(image::open(&path).unwrap().to_luma8(), preview);
    }

    #[test]
    fn test_auto_range_flat() {
        let flat = HeightfieldBuffer::generate(
            &GradientNoiseGenerator::from_seed(1),
            4,
            PlaneExtent::default(),
            &OctaveConfig {
                octaves: 0,
                ..Default::default()
            },
            0.0,
            BiomePalette::default(),
        );
        let options = PngExportOptions::auto_range(&flat);
        assert!(options.min_height < options.max_height);
    }
}
