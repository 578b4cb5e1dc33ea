//! RAW heightmap export for game engine compatibility.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::terrain::HeightfieldBuffer;

/// Errors that can occur during RAW export.
#[derive(Error, Debug)]
pub enum RawExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// RAW export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawFormat {
    /// 16-bit unsigned integer, little-endian (Unity default).
    #[default]
    R16LittleEndian,
    /// 16-bit unsigned integer, big-endian.
    R16BigEndian,
    /// 32-bit float, little-endian (raw elevations, no normalization).
    R32Float,
}

/// Exports grid elevations in row-major order.
///
/// R16 formats normalize `[min_height, max_height]` onto `0..=65535`;
/// R32 writes elevations unchanged and ignores the range.
pub fn export_heightmap_raw(
    buffer: &HeightfieldBuffer,
    path: &Path,
    format: RawFormat,
    min_height: f32,
    max_height: f32,
) -> Result<(), RawExportError> {
    if format != RawFormat::R32Float && !(min_height < max_height) {
        return Err(RawExportError::InvalidHeightRange(min_height, max_height));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let range = max_height - min_height;
    let to_u16 = |height: f32| (((height - min_height) / range).clamp(0.0, 1.0) * 65535.0) as u16;

    for vertex in buffer.vertices() {
        match format {
            RawFormat::R16LittleEndian => writer.write_all(&to_u16(vertex.z).to_le_bytes())?,
            RawFormat::R16BigEndian => writer.write_all(&to_u16(vertex.z).to_be_bytes())?,
            RawFormat::R32Float => writer.write_all(&vertex.z.to_le_bytes())?,
        }
    }

    writer.flush()?;
    Ok(())
}

/// Returns the expected file size for a RAW export of a grid at `resolution`.
pub fn expected_file_size(resolution: u32, format: RawFormat) -> u64 {
    let vertices = if resolution == 0 {
        0
    } else {
        (resolution as u64 + 1) * (resolution as u64 + 1)
    };
    match format {
        RawFormat::R16LittleEndian | RawFormat::R16BigEndian => vertices * 2,
        RawFormat::R32Float => vertices * 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::BiomePalette;
    use crate::noise::{GradientNoiseGenerator, OctaveConfig};
    use crate::terrain::PlaneExtent;
    use tempfile::tempdir;

    fn buffer(resolution: u32) -> HeightfieldBuffer {
        HeightfieldBuffer::generate(
            &GradientNoiseGenerator::from_seed(17),
            resolution,
            PlaneExtent::default(),
            &OctaveConfig::default(),
            0.0,
            BiomePalette::default(),
        )
    }

    #[test]
    fn test_export_raw_r16() {
        let buffer = buffer(63);
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.raw");

        export_heightmap_raw(&buffer, &path, RawFormat::R16LittleEndian, -10.0, 10.0).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), expected_file_size(63, RawFormat::R16LittleEndian));
    }

    #[test]
    fn test_export_raw_r32_preserves_elevations() {
        let buffer = buffer(15);
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.raw");

        export_heightmap_raw(&buffer, &path, RawFormat::R32Float, 0.0, 0.0).unwrap();

        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len() as u64, expected_file_size(15, RawFormat::R32Float));
        let decoded: Vec<f32> = data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(decoded, buffer.elevations());
    }

    #[test]
    fn test_endianness() {
        let buffer = buffer(1);
        let dir = tempdir().unwrap();
        let le = dir.path().join("le.raw");
        let be = dir.path().join("be.raw");
        export_heightmap_raw(&buffer, &le, RawFormat::R16LittleEndian, -10.0, 10.0).unwrap();
        export_heightmap_raw(&buffer, &be, RawFormat::R16BigEndian, -10.0, 10.0).unwrap();

        let le = std::fs::read(le).unwrap();
        let be = std::fs::read(be).unwrap();
        for (a, b) in le.chunks_exact(2).zip(be.chunks_exact(2)) {
            assert_eq!(u16::from_le_bytes([a[0], a[1]]), u16::from_be_bytes([b[0], b[1]]));
        }
    }

    #[test]
    fn test_invalid_range() {
        let buffer = buffer(2);
        let dir = tempdir().unwrap();
        let result = export_heightmap_raw(&buffer, &dir.path().join("x.raw"), RawFormat::R16BigEndian, 1.0, 1.0);
        assert!(matches!(result, Err(RawExportError::InvalidHeightRange(_, _))));
    }

    #[test]
    fn test_expected_file_size() {
        assert_eq!(expected_file_size(255, RawFormat::R16LittleEndian), 256 * 256 * 2);
        assert_eq!(expected_file_size(255, RawFormat::R32Float), 256 * 256 * 4);
        assert_eq!(expected_file_size(0, RawFormat::R32Float), 0);
    }
}
