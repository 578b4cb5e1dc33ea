//! Export module for saving terrain data to image and RAW files.
//!
//! Supports 16-bit PNG heightmaps, RGBA minimaps, vertex colour and normal
//! maps, grayscale noise previews, and RAW heightmaps for engine imports.

mod color_map;
mod normal_map;
mod png;
mod raw;

pub use color_map::{export_color_map_png, ColorMapError};
pub use normal_map::{encode_normal_rgb8, export_normal_map_png, NormalMapError};
pub use png::{
    export_heightmap_png, export_minimap_png, export_preview_png, PngExportError,
    PngExportOptions,
};
pub use raw::{expected_file_size, export_heightmap_raw, RawExportError, RawFormat};
