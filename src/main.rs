//! Terrasynth CLI - procedural heightfield terrain generator.
//!
//! Synthesize fractal simplex terrain, sculpt it with brush strokes, and
//! export heightmaps, colour maps and the biome minimap.

use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use terrasynth::export::{
    export_color_map_png, export_heightmap_png, export_heightmap_raw, export_minimap_png,
    export_normal_map_png, export_preview_png, PngExportOptions, RawFormat,
};
use terrasynth::minimap::{render_noise_preview, PreviewOptions};
use terrasynth::{GradientNoiseGenerator, Terrain, TerrainSettings};

/// Procedural heightfield terrain generator.
#[derive(Parser)]
#[command(name = "terrasynth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terrain grid and export it.
    Generate {
        /// JSON settings file; command-line values override it.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Grid segments per edge.
        #[arg(short, long)]
        resolution: Option<u32>,

        /// World units per noise unit.
        #[arg(long)]
        scale: Option<f64>,

        /// Height multiplier.
        #[arg(long)]
        height: Option<f64>,

        /// Number of noise octaves.
        #[arg(long, allow_negative_numbers = true)]
        octaves: Option<i32>,

        /// Amplitude decay per octave (persistence).
        #[arg(long)]
        persistence: Option<f64>,

        /// Frequency multiplier per octave (lacunarity).
        #[arg(long)]
        lacunarity: Option<f64>,

        /// Water level for biome colouring.
        #[arg(long, allow_negative_numbers = true)]
        water_level: Option<f32>,

        /// Brush radius for strokes.
        #[arg(long)]
        brush_radius: Option<f32>,

        /// Brush strength for strokes (negative lowers terrain).
        #[arg(long, allow_negative_numbers = true)]
        brush_strength: Option<f32>,

        /// Brush stroke at `x,y` (on the surface) or `x,y,z`. Repeatable.
        #[arg(long = "stroke", value_parser = parse_stroke, allow_negative_numbers = true)]
        strokes: Vec<StrokeTarget>,

        /// Minimap edge length in pixels.
        #[arg(long)]
        minimap_size: Option<u32>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Heightmap export format.
        #[arg(short, long, default_value = "png")]
        format: ExportFormat,

        /// Also export the vertex colour map.
        #[arg(long)]
        color_map: bool,

        /// Also export the vertex normal map.
        #[arg(long)]
        normal_map: bool,

        /// Write the effective settings next to the exports.
        #[arg(long)]
        save_config: bool,
    },

    /// Render a grayscale single-octave noise preview.
    Preview {
        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Image width in pixels.
        #[arg(long, default_value = "400")]
        width: u32,

        /// Image height in pixels.
        #[arg(long, default_value = "400")]
        height: u32,

        /// Pixels per noise unit.
        #[arg(long, default_value = "20.0")]
        scale: f64,

        /// Output PNG path.
        #[arg(short, long, default_value = "./output/noise_preview.png")]
        output: PathBuf,
    },

    /// Display buffer sizes for a grid resolution.
    Info {
        /// Grid segments per edge.
        #[arg(short, long, default_value = "100")]
        resolution: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// 16-bit PNG (universal compatibility).
    Png,
    /// 16-bit RAW little-endian (Unity).
    Raw,
    /// 32-bit float RAW (raw elevations).
    RawFloat,
}

/// A stroke position; `z` is taken from the surface when omitted.
#[derive(Clone, Copy, Debug)]
struct StrokeTarget {
    x: f32,
    y: f32,
    z: Option<f32>,
}

fn parse_stroke(s: &str) -> Result<StrokeTarget, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{}': {}", p, e)))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y] => Ok(StrokeTarget { x: *x, y: *y, z: None }),
        [x, y, z] => Ok(StrokeTarget { x: *x, y: *y, z: Some(*z) }),
        _ => Err(format!("expected x,y or x,y,z, got '{}'", s)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            seed,
            resolution,
            scale,
            height,
            octaves,
            persistence,
            lacunarity,
            water_level,
            brush_radius,
            brush_strength,
            strokes,
            minimap_size,
            output,
            name,
            format,
            color_map,
            normal_map,
            save_config,
        } => {
            let mut settings = match config {
                Some(path) => TerrainSettings::load(&path).unwrap_or_else(|e| {
                    eprintln!("Error loading settings from {}: {}", path.display(), e);
                    std::process::exit(1);
                }),
                None => TerrainSettings::default(),
            };

            if let Some(v) = resolution {
                settings.resolution = v;
            }
            if let Some(v) = scale {
                settings.noise.scale = v;
            }
            if let Some(v) = height {
                settings.noise.height_scale = v;
            }
            if let Some(v) = octaves {
                settings.noise.octaves = v;
            }
            if let Some(v) = persistence {
                settings.noise.persistence = v;
            }
            if let Some(v) = lacunarity {
                settings.noise.lacunarity = v;
            }
            if let Some(v) = water_level {
                settings.water_level = v;
            }
            if let Some(v) = brush_radius {
                settings.brush.radius = v;
            }
            if let Some(v) = brush_strength {
                settings.brush.strength = v;
            }
            if let Some(v) = minimap_size {
                settings.minimap_width = v;
                settings.minimap_height = v;
            }

            run_generate(
                settings.sanitized(),
                seed,
                &strokes,
                &output,
                &name,
                format,
                color_map,
                normal_map,
                save_config,
            );
        }
        Commands::Preview {
            seed,
            width,
            height,
            scale,
            output,
        } => {
            run_preview(seed, width, height, scale, &output);
        }
        Commands::Info { resolution } => {
            run_info(resolution);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    settings: TerrainSettings,
    seed: Option<u64>,
    strokes: &[StrokeTarget],
    output: &Path,
    name: &str,
    format: ExportFormat,
    color_map: bool,
    normal_map: bool,
    save_config: bool,
) {
    let seed = seed.unwrap_or_else(rand::random);

    println!("Terrasynth - Procedural Terrain Generator");
    println!("=========================================");
    println!("Resolution: {0}x{0} segments", settings.resolution);
    println!("Seed: {}", seed);
    println!(
        "Noise: octaves={} persistence={} lacunarity={} scale={} height={}",
        settings.noise.octaves,
        settings.noise.persistence,
        settings.noise.lacunarity,
        settings.noise.scale,
        settings.noise.height_scale
    );
    println!("Water level: {}", settings.water_level);
    println!("Output: {}", output.display());

    let start = Instant::now();

    println!("\nSynthesizing terrain...");
    let mut terrain = Terrain::new(settings, Some(seed));

    if !strokes.is_empty() {
        println!("Applying {} brush stroke(s)...", strokes.len());
        for stroke in strokes {
            let z = stroke.z.unwrap_or_else(|| {
                let field = terrain.heightfield();
                field
                    .nearest_vertex(stroke.x, stroke.y)
                    .map(|i| field.vertices()[i].z)
                    .unwrap_or(0.0)
            });
            let affected = terrain.sculpt(Vec3::new(stroke.x, stroke.y, z));
            println!(
                "  Stroke at ({:.2}, {:.2}, {:.2}): {} vertices",
                stroke.x, stroke.y, z, affected
            );
        }
    }

    println!("Generation completed in {:.2?}", start.elapsed());

    let field = terrain.heightfield();
    if field.is_empty() {
        println!("Grid is empty (resolution 0); nothing to export.");
        return;
    }

    let (min_h, max_h) = field.height_range();
    println!("Height range: [{:.4}, {:.4}]", min_h, max_h);

    println!("\nExporting...");
    let export_start = Instant::now();

    std::fs::create_dir_all(output).unwrap_or_else(|e| {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    });

    let options = PngExportOptions::auto_range(field);
    match format {
        ExportFormat::Png => {
            let path = output.join(format!("{}_height.png", name));
            export_heightmap_png(field, &path, &options).unwrap_or_else(|e| {
                eprintln!("Error exporting PNG: {}", e);
                std::process::exit(1);
            });
            println!("  Exported heightmap: {}", path.display());
        }
        ExportFormat::Raw | ExportFormat::RawFloat => {
            let raw_format = match format {
                ExportFormat::RawFloat => RawFormat::R32Float,
                _ => RawFormat::R16LittleEndian,
            };
            let path = output.join(format!("{}_height.raw", name));
            export_heightmap_raw(field, &path, raw_format, options.min_height, options.max_height)
                .unwrap_or_else(|e| {
                    eprintln!("Error exporting RAW: {}", e);
                    std::process::exit(1);
                });
            println!(
                "  Exported heightmap: {} ({}x{} {:?})",
                path.display(),
                field.row_len(),
                field.row_len(),
                raw_format
            );
        }
    }

    let minimap = terrain.minimap();
    if minimap.width() > 0 && minimap.height() > 0 {
        let path = output.join(format!("{}_minimap.png", name));
        export_minimap_png(minimap, &path).unwrap_or_else(|e| {
            eprintln!("Error exporting minimap: {}", e);
            std::process::exit(1);
        });
        println!("  Exported minimap: {}", path.display());
    }

    if color_map {
        let path = output.join(format!("{}_colors.png", name));
        export_color_map_png(field, &path).unwrap_or_else(|e| {
            eprintln!("Error exporting colour map: {}", e);
            std::process::exit(1);
        });
        println!("  Exported colour map: {}", path.display());
    }

    if normal_map {
        let path = output.join(format!("{}_normals.png", name));
        export_normal_map_png(field, &path).unwrap_or_else(|e| {
            eprintln!("Error exporting normal map: {}", e);
            std::process::exit(1);
        });
        println!("  Exported normal map: {}", path.display());
    }

    if save_config {
        let path = output.join(format!("{}_settings.json", name));
        let json = terrain.settings().to_json().unwrap_or_else(|e| {
            eprintln!("Error serializing settings: {}", e);
            std::process::exit(1);
        });
        std::fs::write(&path, json).unwrap_or_else(|e| {
            eprintln!("Error writing settings: {}", e);
            std::process::exit(1);
        });
        println!("  Saved settings: {}", path.display());
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn run_preview(seed: Option<u64>, width: u32, height: u32, scale: f64, output: &Path) {
    if !(scale.is_finite() && scale > 0.0) {
        eprintln!("Error: scale must be a positive number");
        std::process::exit(1);
    }

    let noise = match seed {
        Some(seed) => GradientNoiseGenerator::from_seed(seed),
        None => GradientNoiseGenerator::from_entropy(),
    };
    let preview = render_noise_preview(&noise, &PreviewOptions { width, height, scale });

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            eprintln!("Error creating output directory: {}", e);
            std::process::exit(1);
        });
    }
    export_preview_png(&preview, output).unwrap_or_else(|e| {
        eprintln!("Error exporting preview: {}", e);
        std::process::exit(1);
    });
    println!("Exported {}x{} noise preview: {}", width, height, output.display());
}

fn run_info(resolution: u32) {
    let row = if resolution == 0 { 0 } else { resolution as u64 + 1 };
    let vertices = row * row;
    let triangles = (resolution as u64) * (resolution as u64) * 2;

    let bytes_positions = vertices * 3 * 4;
    let bytes_colors = vertices * 3 * 4;
    let bytes_normals = vertices * 3 * 4;
    let bytes_indices = triangles * 3 * 4;
    let bytes_png = vertices * 2;
    let bytes_raw_r32 = vertices * 4;

    let mb = |b: u64| b as f64 / 1024.0 / 1024.0;

    println!("Terrasynth - Grid Info");
    println!("======================");
    println!();
    println!("Resolution: {0}x{0} segments", resolution);
    println!("Vertices:   {:>12}", vertices);
    println!("Triangles:  {:>12}", triangles);
    println!();
    println!("Renderer buffers (f32 / u32):");
    println!("  Positions: {:>12} bytes ({:.2} MB)", bytes_positions, mb(bytes_positions));
    println!("  Colors:    {:>12} bytes ({:.2} MB)", bytes_colors, mb(bytes_colors));
    println!("  Normals:   {:>12} bytes ({:.2} MB)", bytes_normals, mb(bytes_normals));
    println!("  Indices:   {:>12} bytes ({:.2} MB)", bytes_indices, mb(bytes_indices));
    println!();
    println!("Export file sizes:");
    println!("  PNG (16-bit): {:>10} bytes uncompressed", bytes_png);
    println!("  RAW (R32):    {:>10} bytes", bytes_raw_r32);
}
