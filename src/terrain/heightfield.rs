//! Per-vertex heightfield grid and the flat buffers handed to a renderer.

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::brush::DeformationBrush;
use crate::biomes::{classify, BiomePalette};
use crate::noise::{fractal_elevation, GradientNoiseGenerator, OctaveConfig};

/// World-space size of the terrain plane. Independent of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneExtent {
    pub width: f32,
    pub depth: f32,
}

impl Default for PlaneExtent {
    fn default() -> Self {
        Self {
            width: 200.0,
            depth: 200.0,
        }
    }
}

/// One grid vertex: fixed planar position, mutable elevation and colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightVertex {
    pub x: f32,
    pub y: f32,
    /// Elevation.
    pub z: f32,
    /// RGB in [0, 1], derived from `z` and the water level.
    pub color: [f32; 3],
}

impl HeightVertex {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// The authoritative terrain grid.
///
/// Holds `(resolution + 1)²` vertices in row-major order. Row 0 is the far
/// edge (`y = depth / 2`), column 0 the left edge (`x = -width / 2`).
/// Normals are kept in step with positions after every mutation.
#[derive(Debug, Clone)]
pub struct HeightfieldBuffer {
    resolution: u32,
    extent: PlaneExtent,
    palette: BiomePalette,
    vertices: Vec<HeightVertex>,
    normals: Vec<Vec3>,
}

impl HeightfieldBuffer {
    /// Synthesizes a complete grid from noise.
    ///
    /// A resolution of 0 yields an empty grid.
    pub fn generate(
        noise: &GradientNoiseGenerator,
        resolution: u32,
        extent: PlaneExtent,
        config: &OctaveConfig,
        water_level: f32,
        palette: BiomePalette,
    ) -> Self {
        let vertices = if resolution == 0 {
            Vec::new()
        } else {
            let row_len = resolution as usize + 1;
            let seg_w = extent.width as f64 / resolution as f64;
            let seg_d = extent.depth as f64 / resolution as f64;
            let half_w = extent.width as f64 / 2.0;
            let half_d = extent.depth as f64 / 2.0;

            (0..row_len * row_len)
                .into_par_iter()
                .map(|i| {
                    let ix = (i % row_len) as f64;
                    let iy = (i / row_len) as f64;
                    let x = (ix * seg_w - half_w) as f32;
                    let y = (half_d - iy * seg_d) as f32;
                    let z = fractal_elevation(noise, x as f64, y as f64, config) as f32;
                    HeightVertex {
                        x,
                        y,
                        z,
                        color: palette.rgb_f32(classify(z, water_level)),
                    }
                })
                .collect()
        };

        let mut buffer = Self {
            resolution,
            extent,
            palette,
            vertices,
            normals: Vec::new(),
        };
        buffer.recompute_normals();

        tracing::debug!(
            resolution,
            vertices = buffer.vertices.len(),
            "heightfield generated"
        );
        buffer
    }

    /// Replaces the whole grid with a freshly synthesized one.
    ///
    /// The new grid is built completely before it replaces the old one.
    pub fn regenerate(
        &mut self,
        noise: &GradientNoiseGenerator,
        resolution: u32,
        config: &OctaveConfig,
        water_level: f32,
    ) {
        *self = Self::generate(noise, resolution, self.extent, config, water_level, self.palette);
    }

    /// Applies a brush stroke in place, then re-derives colours and normals.
    ///
    /// Returns the number of vertices the stroke touched.
    pub fn patch(&mut self, center: Vec3, brush: &DeformationBrush, water_level: f32) -> usize {
        let affected = brush.apply(&mut self.vertices, center);
        if affected > 0 {
            self.reclassify(water_level);
            self.recompute_normals();
        }
        tracing::debug!(
            x = center.x,
            y = center.y,
            z = center.z,
            radius = brush.radius,
            affected,
            "brush applied"
        );
        affected
    }

    /// Re-derives every vertex colour from its current elevation.
    pub fn reclassify(&mut self, water_level: f32) {
        let palette = self.palette;
        self.vertices.par_iter_mut().for_each(|v| {
            v.color = palette.rgb_f32(classify(v.z, water_level));
        });
    }

    /// Swaps the colour palette and recolours.
    pub fn set_palette(&mut self, palette: BiomePalette, water_level: f32) {
        self.palette = palette;
        self.reclassify(water_level);
    }

    /// Recomputes area-weighted vertex normals from current positions.
    pub fn recompute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];
        for [a, b, c] in self.triangles() {
            let pa = self.vertices[a].position();
            let pb = self.vertices[b].position();
            let pc = self.vertices[c].position();
            let n = (pc - pb).cross(pa - pb);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        self.normals = acc.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    /// Vertex index triples, two triangles per grid cell.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let res = self.resolution as usize;
        let row_len = res + 1;
        let cells = if self.vertices.is_empty() { 0 } else { res * res };
        (0..cells).flat_map(move |cell| {
            let ix = cell % res;
            let iy = cell / res;
            let a = iy * row_len + ix;
            let b = (iy + 1) * row_len + ix;
            let c = (iy + 1) * row_len + ix + 1;
            let d = iy * row_len + ix + 1;
            [[a, b, d], [b, c, d]]
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn extent(&self) -> PlaneExtent {
        self.extent
    }

    pub fn palette(&self) -> &BiomePalette {
        &self.palette
    }

    /// Vertices per row (and per column). Zero for an empty grid.
    pub fn row_len(&self) -> u32 {
        if self.vertices.is_empty() {
            0
        } else {
            self.resolution + 1
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[HeightVertex] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Returns the vertex at grid column `ix`, row `iy`.
    pub fn vertex(&self, ix: u32, iy: u32) -> Option<&HeightVertex> {
        let row_len = self.row_len();
        if ix >= row_len || iy >= row_len {
            return None;
        }
        self.vertices.get((iy * row_len + ix) as usize)
    }

    /// Index of the vertex closest to planar point `(x, y)`.
    pub fn nearest_vertex(&self, x: f32, y: f32) -> Option<usize> {
        if self.vertices.is_empty() {
            return None;
        }
        let res = self.resolution as f32;
        let fx = (x + self.extent.width / 2.0) / self.extent.width * res;
        let fy = (self.extent.depth / 2.0 - y) / self.extent.depth * res;
        let ix = fx.round().clamp(0.0, res) as usize;
        let iy = fy.round().clamp(0.0, res) as usize;
        Some(iy * (self.resolution as usize + 1) + ix)
    }

    /// Elevations in row-major order.
    pub fn elevations(&self) -> Vec<f32> {
        self.vertices.iter().map(|v| v.z).collect()
    }

    /// Flat `x, y, z` triples.
    pub fn position_buffer(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
    }

    /// Flat `r, g, b` triples, parallel to [`Self::position_buffer`].
    pub fn color_buffer(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.color).collect()
    }

    /// Flat normal triples, parallel to [`Self::position_buffer`].
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }

    pub fn index_buffer(&self) -> Vec<u32> {
        self.triangles().flatten().map(|i| i as u32).collect()
    }

    /// (min, max) elevation. `(0.0, 0.0)` for an empty grid.
    pub fn height_range(&self) -> (f32, f32) {
        if self.vertices.is_empty() {
            return (0.0, 0.0);
        }
        self.vertices.iter().fold((f32::MAX, f32::MIN), |(min, max), v| {
            (min.min(v.z), max.max(v.z))
        })
    }
}
