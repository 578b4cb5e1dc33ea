//! Normal map export from the grid's vertex normals.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use glam::Vec3;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};
use thiserror::Error;

use crate::terrain::HeightfieldBuffer;

/// Errors that can occur during normal map export.
#[derive(Error, Debug)]
pub enum NormalMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Heightfield has no vertices")]
    EmptyHeightfield,
}

/// Packs a unit normal into RGB8 (`[-1, 1]` onto `0..=255`).
pub fn encode_normal_rgb8(n: Vec3) -> [u8; 3] {
    let c = (n * 0.5) + Vec3::splat(0.5);
    [
        (c.x.clamp(0.0, 1.0) * 255.0) as u8,
        (c.y.clamp(0.0, 1.0) * 255.0) as u8,
        (c.z.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

/// Exports vertex normals as an RGB PNG, one pixel per vertex.
///
/// Z (the elevation axis) points out of the image.
pub fn export_normal_map_png(buffer: &HeightfieldBuffer, path: &Path) -> Result<(), NormalMapError> {
    if buffer.is_empty() {
        return Err(NormalMapError::EmptyHeightfield);
    }

    let side = buffer.row_len();
    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(side, side);
    for (pixel, n) in img.pixels_mut().zip(buffer.normals()) {
        *pixel = Rgb(encode_normal_rgb8(*n));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(img.as_raw(), side, side, image::ExtendedColorType::Rgb8)?;
    Ok(())
}
