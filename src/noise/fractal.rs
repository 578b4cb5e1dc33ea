//! Multi-octave fractal elevation built on simplex noise.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::GradientNoiseGenerator;

/// Configuration for multi-octave elevation synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctaveConfig {
    /// Number of octaves. Zero or negative yields flat terrain.
    pub octaves: i32,
    /// Amplitude decay per octave (0.3-0.7 typical).
    pub persistence: f64,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f64,
    /// World units per noise unit; larger values stretch features out.
    pub scale: f64,
    /// Multiplier applied to the summed octaves.
    pub height_scale: f64,
}

impl Default for OctaveConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            scale: 20.0,
            height_scale: 5.0,
        }
    }
}

impl OctaveConfig {
    /// Single octave with no decay: elevation is one raw noise sample.
    pub fn single_octave(scale: f64, height_scale: f64) -> Self {
        Self {
            octaves: 1,
            persistence: 1.0,
            lacunarity: 1.0,
            scale,
            height_scale,
        }
    }

    /// Tall, rugged relief that reaches the mountain bands.
    pub fn mountainous() -> Self {
        Self {
            octaves: 6,
            persistence: 0.55,
            lacunarity: 2.1,
            scale: 60.0,
            height_scale: 30.0,
        }
    }

    /// Gentle low-frequency relief.
    pub fn rolling_hills() -> Self {
        Self {
            octaves: 3,
            persistence: 0.4,
            lacunarity: 2.0,
            scale: 40.0,
            height_scale: 8.0,
        }
    }
}

/// Computes the fractal elevation at world coordinate `(x, y)`.
///
/// Octave `k` samples at `(x / scale * f_k, y / scale * f_k)` with weight
/// `a_k`, where `a_0 = f_0 = 1`, `a_{k+1} = a_k * persistence` and
/// `f_{k+1} = f_k * lacunarity`. The sum is multiplied by `height_scale`.
/// Accumulation stops once the frequency or amplitude overflows.
///
/// Mesh vertices and minimap pixels both go through this function so the two
/// views agree at their own resolutions.
pub fn fractal_elevation(
    noise: &GradientNoiseGenerator,
    x: f64,
    y: f64,
    config: &OctaveConfig,
) -> f64 {
    if config.octaves <= 0 {
        return 0.0;
    }

    let mut total = 0.0f64;
    let mut amplitude = 1.0f64;
    let mut frequency = 1.0f64;

    for _ in 0..config.octaves {
        // Later octaves can no longer contribute a finite amount.
        if !(frequency.is_finite() && amplitude.is_finite()) {
            break;
        }
        let value = noise.sample(x / config.scale * frequency, y / config.scale * frequency);
        total += value * amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    total * config.height_scale
}

/// Computes fractal elevations for a batch of world coordinates.
///
/// Each result is bit-identical to the matching [`fractal_elevation`] call.
pub fn fractal_elevation_batch(
    noise: &GradientNoiseGenerator,
    points: &[(f64, f64)],
    config: &OctaveConfig,
) -> Vec<f64> {
    points
        .par_iter()
        .map(|&(x, y)| fractal_elevation(noise, x, y, config))
        .collect()
}
