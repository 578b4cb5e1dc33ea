//! Noise generation module for terrain synthesis.
//!
//! A single 2D simplex generator backs every consumer; fractal octave
//! accumulation is layered on top of it.

mod fractal;
mod simplex;

pub use fractal::{fractal_elevation, fractal_elevation_batch, OctaveConfig};
pub use simplex::{GradientNoiseGenerator, PermutationTable, GRADIENTS_2D};
