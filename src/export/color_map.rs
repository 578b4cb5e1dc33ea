//! Vertex colour map export.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};
use thiserror::Error;

use crate::terrain::HeightfieldBuffer;

/// Errors that can occur during colour map export.
#[derive(Error, Debug)]
pub enum ColorMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Heightfield has no vertices")]
    EmptyHeightfield,
}

/// Exports the grid's current vertex colours as an RGB PNG, one pixel per vertex.
///
/// Unlike the minimap this reflects brush edits, since it reads the grid.
pub fn export_color_map_png(buffer: &HeightfieldBuffer, path: &Path) -> Result<(), ColorMapError> {
    if buffer.is_empty() {
        return Err(ColorMapError::EmptyHeightfield);
    }

    let side = buffer.row_len();
    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(side, side);
    for (pixel, vertex) in img.pixels_mut().zip(buffer.vertices()) {
        let [r, g, b] = vertex.color;
        *pixel = Rgb([
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        ]);
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(img.as_raw(), side, side, image::ExtendedColorType::Rgb8)?;

    Ok(())
}
