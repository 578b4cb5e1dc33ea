//! Cosine-falloff sculpting brush.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::heightfield::HeightVertex;

/// Raises (or, with negative strength, lowers) terrain around a point.
///
/// Strokes are additive and unclamped. Two strokes aimed at the surface under
/// the cursor move the terrain twice as far as one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeformationBrush {
    /// Influence radius in world units. Non-positive radii affect nothing.
    pub radius: f32,
    /// Elevation added at the brush centre.
    pub strength: f32,
}

impl Default for DeformationBrush {
    fn default() -> Self {
        Self {
            radius: 5.0,
            strength: 2.0,
        }
    }
}

impl DeformationBrush {
    pub fn new(radius: f32, strength: f32) -> Self {
        Self { radius, strength }
    }

    /// Elevation delta at `distance` from the centre.
    ///
    /// `strength * cos(distance / radius * π/2)` inside the radius, exactly
    /// zero at or beyond it.
    pub fn delta_at(&self, distance: f32) -> f32 {
        if !(self.radius > 0.0) || !(distance < self.radius) {
            return 0.0;
        }
        self.strength * (distance / self.radius * FRAC_PI_2).cos()
    }

    /// Applies one stroke centred at `center`, returning how many vertices moved.
    ///
    /// Distance is measured in 3D against each vertex's current elevation, so
    /// earlier strokes change the footprint of later ones.
    pub fn apply(&self, vertices: &mut [HeightVertex], center: Vec3) -> usize {
        if !(self.radius > 0.0) {
            return 0;
        }

        let mut affected = 0;
        for vertex in vertices.iter_mut() {
            let distance = center.distance(vertex.position());
            if distance < self.radius {
                vertex.z += self.delta_at(distance);
                affected += 1;
            }
        }
        affected
    }
}
