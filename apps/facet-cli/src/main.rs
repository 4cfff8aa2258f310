use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use facet_common::{Controls, Shape};
use facet_geometry::{MeshData, cube, icosphere, square};
use facet_input::ControlPanel;
use facet_render::{Camera, DebugTextRenderer, shaders};
use facet_scene::FrameDriver;
use glam::Vec3;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "facet-cli", about = "Headless tooling for the mesh and shader demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the embedded shader library
    Info,
    /// Generate a mesh and print its statistics
    Mesh {
        #[arg(short, long, value_enum, default_value = "sphere")]
        shape: ShapeArg,
        /// Icosphere subdivision level (0-8)
        #[arg(short, long, default_value = "5")]
        tessellation: u32,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Drive frames through the text renderer and print the command log
    Frames {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "3")]
        count: u32,
        /// YAML file with the starting control values
        #[arg(long)]
        preset: Option<PathBuf>,
        /// Switch to the next shape every frame
        #[arg(long)]
        cycle_shapes: bool,
    },
    /// Print a preset as normalized YAML (the defaults when no file is given)
    Preset { path: Option<PathBuf> },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Sphere,
    Square,
    Cube,
}

impl From<ShapeArg> for Shape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Sphere => Shape::Sphere,
            ShapeArg::Square => Shape::Square,
            ShapeArg::Cube => Shape::Cube,
        }
    }
}

#[derive(Serialize)]
struct MeshStats {
    shape: Shape,
    #[serde(skip_serializing_if = "Option::is_none")]
    tessellation: Option<u32>,
    vertices: usize,
    triangles: usize,
    valid: bool,
}

fn mesh_for(shape: Shape, tessellation: u32) -> MeshData {
    match shape {
        Shape::Sphere => icosphere(Vec3::ZERO, 1.0, tessellation),
        Shape::Square => square(Vec3::ZERO),
        Shape::Cube => cube(Vec3::ZERO),
    }
}

fn load_controls(preset: Option<&PathBuf>) -> Result<Controls> {
    match preset {
        Some(path) => Controls::load_preset(path)
            .with_context(|| format!("loading preset {}", path.display())),
        None => Ok(Controls::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("facet-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("shader stages:");
            for stage in shaders::all_stages() {
                println!("  {:<20} {}", stage.label, stage.kind);
            }
        }
        Commands::Mesh {
            shape,
            tessellation,
            json,
        } => {
            let shape = Shape::from(shape);
            let tessellation = tessellation.min(facet_common::MAX_TESSELLATION);
            let mesh = mesh_for(shape, tessellation);
            let valid = match mesh.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("generated mesh is malformed: {e}");
                    false
                }
            };
            let stats = MeshStats {
                shape,
                tessellation: (shape == Shape::Sphere).then_some(tessellation),
                vertices: mesh.vertex_count(),
                triangles: mesh.triangle_count(),
                valid,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "{}: {} vertices, {} triangles{}",
                    shape.label(),
                    stats.vertices,
                    stats.triangles,
                    if stats.valid { "" } else { " (invalid)" }
                );
            }
        }
        Commands::Frames {
            count,
            preset,
            cycle_shapes,
        } => {
            let controls = load_controls(preset.as_ref())?;
            let mut panel = ControlPanel::new(controls);
            let mut renderer = DebugTextRenderer::new();
            let mut driver = FrameDriver::new(&mut renderer, *panel.controls(), Camera::default())?;
            driver.resize(&mut renderer, 800, 600);

            let start = Instant::now();
            for frame in 0..count {
                if cycle_shapes && frame > 0 {
                    let next = Shape::ALL[frame as usize % Shape::ALL.len()];
                    panel.set_shape(next);
                }
                driver.handle_all(&mut renderer, panel.drain_events())?;
                let now = start + Duration::from_millis(16 * u64::from(frame));
                driver.tick(&mut renderer, &(), now);
            }

            let stats = driver.stats();
            driver.release(&mut renderer);
            println!("{}", renderer.output());
            println!(
                "frames={} shader_builds={} mesh_rebuilds={}",
                stats.frames, stats.shader_builds, stats.mesh_rebuilds
            );
        }
        Commands::Preset { path } => {
            let controls = load_controls(path.as_ref())?;
            print!("{}", controls.to_yaml_string()?);
        }
    }

    Ok(())
}
