//! Terrain session: one noise generator, its grid and its minimap.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::brush::DeformationBrush;
use super::config::TerrainSettings;
use super::heightfield::HeightfieldBuffer;
use crate::minimap::{MinimapRaster, MinimapRasterizer};
use crate::noise::GradientNoiseGenerator;

/// Owns the current generator, grid and minimap and keeps them in step.
///
/// Every mutation leaves colours, normals and the minimap re-derived before
/// returning, so consumers can read any accessor at any time. Callers
/// serialize mutations; there is no internal locking.
#[derive(Debug)]
pub struct Terrain {
    settings: TerrainSettings,
    /// Seeded stream for reproducible regeneration, `None` for entropy.
    rng: Option<ChaCha8Rng>,
    noise: GradientNoiseGenerator,
    heightfield: HeightfieldBuffer,
    minimap: MinimapRaster,
    generation: u64,
}

impl Terrain {
    /// Creates a terrain from settings.
    ///
    /// With a seed, the initial table and every later regeneration are drawn
    /// from one seeded stream, so the whole sequence is reproducible.
    pub fn new(settings: TerrainSettings, seed: Option<u64>) -> Self {
        let settings = settings.sanitized();
        let mut rng = seed.map(ChaCha8Rng::seed_from_u64);
        let noise = next_generator(&mut rng);
        let heightfield = build_heightfield(&noise, &settings);
        let minimap = rasterizer(&settings).render(&noise, &settings.noise, settings.water_level);

        tracing::info!(
            resolution = settings.resolution,
            vertices = heightfield.vertex_count(),
            seeded = seed.is_some(),
            "terrain created"
        );

        Self {
            settings,
            rng,
            noise,
            heightfield,
            minimap,
            generation: 0,
        }
    }

    /// Discards the generator and builds unrelated terrain from a new table.
    pub fn regenerate(&mut self) {
        let noise = next_generator(&mut self.rng);
        let heightfield = build_heightfield(&noise, &self.settings);
        let minimap =
            rasterizer(&self.settings).render(&noise, &self.settings.noise, self.settings.water_level);

        self.noise = noise;
        self.heightfield = heightfield;
        self.minimap = minimap;
        self.generation += 1;

        tracing::info!(generation = self.generation, "terrain regenerated");
    }

    /// Re-synthesizes the grid and minimap with new settings on the current table.
    ///
    /// Brush edits are discarded since every elevation is recomputed.
    pub fn apply_settings(&mut self, settings: TerrainSettings) {
        let settings = settings.sanitized();
        let heightfield = build_heightfield(&self.noise, &settings);
        let minimap = rasterizer(&settings).render(&self.noise, &settings.noise, settings.water_level);

        self.settings = settings;
        self.heightfield = heightfield;
        self.minimap = minimap;
    }

    /// Moves the water level, recolouring the grid and minimap.
    pub fn set_water_level(&mut self, water_level: f32) {
        let water_level = if water_level.is_finite() {
            water_level
        } else {
            TerrainSettings::default().water_level
        };
        self.settings.water_level = water_level;
        self.heightfield.reclassify(water_level);
        self.refresh_minimap();
    }

    /// Sculpts with the configured brush at a world-space point.
    pub fn sculpt(&mut self, point: Vec3) -> usize {
        let brush = self.settings.brush;
        self.sculpt_with(point, &brush)
    }

    /// Sculpts with an explicit brush at a world-space point.
    pub fn sculpt_with(&mut self, point: Vec3, brush: &DeformationBrush) -> usize {
        let affected = self.heightfield.patch(point, brush, self.settings.water_level);
        self.refresh_minimap();
        affected
    }

    /// Re-renders the minimap from the current table and settings.
    pub fn refresh_minimap(&mut self) {
        self.minimap =
            rasterizer(&self.settings).render(&self.noise, &self.settings.noise, self.settings.water_level);
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn noise(&self) -> &GradientNoiseGenerator {
        &self.noise
    }

    pub fn heightfield(&self) -> &HeightfieldBuffer {
        &self.heightfield
    }

    pub fn minimap(&self) -> &MinimapRaster {
        &self.minimap
    }

    /// Number of completed regenerations.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn next_generator(rng: &mut Option<ChaCha8Rng>) -> GradientNoiseGenerator {
    match rng {
        Some(rng) => GradientNoiseGenerator::new(rng),
        None => GradientNoiseGenerator::from_entropy(),
    }
}

fn build_heightfield(noise: &GradientNoiseGenerator, settings: &TerrainSettings) -> HeightfieldBuffer {
    HeightfieldBuffer::generate(
        noise,
        settings.resolution,
        settings.extent,
        &settings.noise,
        settings.water_level,
        settings.palette,
    )
}

fn rasterizer(settings: &TerrainSettings) -> MinimapRasterizer {
    MinimapRasterizer::new(settings.minimap_width, settings.minimap_height, settings.extent)
        .with_palette(settings.palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::classify;

    fn small_settings() -> TerrainSettings {
        TerrainSettings {
            resolution: 24,
            minimap_width: 32,
            minimap_height: 32,
            ..Default::default()
        }
    }

    #[test]
    fn test_seeded_sessions_match() {
        let a = Terrain::new(small_settings(), Some(5));
        let b = Terrain::new(small_settings(), Some(5));
        assert_eq!(a.heightfield().elevations(), b.heightfield().elevations());
        assert_eq!(a.minimap(), b.minimap());
    }

    #[test]
    fn test_regenerate_draws_new_table() {
        let mut terrain = Terrain::new(small_settings(), Some(6));
        let before = terrain.noise().table().base().to_vec();
        let heights = terrain.heightfield().elevations();

        terrain.regenerate();

        assert_eq!(terrain.generation(), 1);
        assert_ne!(terrain.noise().table().base(), &before[..]);
        assert_ne!(terrain.heightfield().elevations(), heights);
    }

    #[test]
    fn test_seeded_regeneration_sequence_is_reproducible() {
        let mut a = Terrain::new(small_settings(), Some(7));
        let mut b = Terrain::new(small_settings(), Some(7));
        a.regenerate();
        a.regenerate();
        b.regenerate();
        b.regenerate();
        assert_eq!(a.noise().table().base(), b.noise().table().base());
    }

    #[test]
    fn test_water_level_recolors() {
        let mut terrain = Terrain::new(small_settings(), Some(8));
        terrain.set_water_level(3.0);
        assert_eq!(terrain.settings().water_level, 3.0);
        let palette = *terrain.heightfield().palette();
        for v in terrain.heightfield().vertices() {
            assert_eq!(v.color, palette.rgb_f32(classify(v.z, 3.0)));
        }
    }

    #[test]
    fn test_sculpt_raises_and_keeps_colors_current() {
        let mut terrain = Terrain::new(small_settings(), Some(9));
        let idx = terrain.heightfield().nearest_vertex(0.0, 0.0).unwrap();
        let before = terrain.heightfield().vertices()[idx];

        let affected = terrain.sculpt(before.position());

        let after = terrain.heightfield().vertices()[idx];
        assert!(affected >= 1);
        assert_eq!(after.z, before.z + 2.0);
        assert_eq!(after.color, terrain.heightfield().palette().rgb_f32(classify(after.z, 0.0)));
    }

    #[test]
    fn test_apply_settings_resizes() {
        let mut terrain = Terrain::new(small_settings(), Some(10));
        let mut settings = small_settings();
        settings.resolution = 10;
        settings.minimap_width = 50;
        settings.minimap_height = 20;
        terrain.apply_settings(settings);

        assert_eq!(terrain.heightfield().vertex_count(), 121);
        assert_eq!((terrain.minimap().width(), terrain.minimap().height()), (50, 20));
    }

    #[test]
    fn test_excessive_octaves_keep_surface_valid() {
        let mut settings = small_settings();
        settings.resolution = 4;
        settings.noise.octaves = 1100;
        let mut terrain = Terrain::new(settings, Some(1));

        assert_eq!(terrain.settings().noise.octaves, 4);
        let check = |terrain: &Terrain| {
            let field = terrain.heightfield();
            assert_eq!(field.vertex_count(), 25);
            assert!(field.vertices().iter().all(|v| v.z.is_finite()));
            assert!(field.normals().iter().all(|n| (n.length() - 1.0).abs() < 1e-4));
        };
        check(&terrain);

        let mut settings = terrain.settings().clone();
        settings.noise.octaves = i32::MAX;
        terrain.apply_settings(settings);
        check(&terrain);
    }

    #[test]
    fn test_non_finite_water_level_falls_back() {
        let mut terrain = Terrain::new(small_settings(), Some(11));
        terrain.set_water_level(f32::NAN);
        assert_eq!(terrain.settings().water_level, 0.0);
    }
}
