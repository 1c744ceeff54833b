//! Heightfield CLI - procedural terrain mesh generator.
//!
//! Builds a displaced grid mesh from multi-octave noise and exports it as
//! a mesh (OBJ, JSON) or a heightmap image (PNG, RAW).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use heightfield::export::{
    export_mesh_json, export_mesh_obj, export_mesh_png, export_mesh_raw,
    ObjExportOptions, PngExportOptions, RawFormat,
};
use heightfield::noise::Seed;
use heightfield::terrain::{GridConfig, HeightfieldService, TerrainConfig};

/// Procedural terrain heightfield generator.
#[derive(Parser)]
#[command(name = "heightfield")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terrain mesh and export it.
    Generate {
        /// Grid cells along x.
        #[arg(short, long, default_value = "255")]
        width: u32,

        /// Grid cells along z.
        #[arg(long, default_value = "255")]
        height: u32,

        /// Interpret width and height as vertex counts instead of cells.
        #[arg(long)]
        vertex_counts: bool,

        /// Random seed for reproducible generation (defaults to the current time).
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON terrain configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Plane size along x.
        #[arg(long)]
        extent_x: Option<f32>,

        /// Plane size along z.
        #[arg(long)]
        extent_z: Option<f32>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Export format.
        #[arg(short, long, default_value = "obj")]
        format: ExportFormat,

        /// Include wireframe edges as line elements (OBJ only).
        #[arg(long)]
        wireframe: bool,
    },

    /// Display mesh sizes for a grid without generating it.
    Info {
        /// Grid cells along x.
        #[arg(long, default_value = "255")]
        width: u32,

        /// Grid cells along z.
        #[arg(long, default_value = "255")]
        height: u32,

        /// Interpret width and height as vertex counts instead of cells.
        #[arg(long)]
        vertex_counts: bool,
    },

    /// Print the effective terrain configuration as JSON.
    DumpConfig {
        /// Seed to place in the configuration.
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Start from this JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// Wavefront OBJ mesh with normals.
    Obj,
    /// JSON document with positions, triangles and edges.
    Json,
    /// 16-bit grayscale PNG heightmap.
    Png,
    /// 16-bit RAW little-endian heightmap (Unity).
    Raw,
    /// 32-bit float RAW heightmap.
    RawFloat,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Obj => "obj",
            ExportFormat::Json => "json",
            ExportFormat::Png => "png",
            ExportFormat::Raw | ExportFormat::RawFloat => "raw",
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            width,
            height,
            vertex_counts,
            seed,
            config,
            extent_x,
            extent_z,
            output,
            name,
            format,
            wireframe,
        } => {
            let grid = grid_from_args(width, height, vertex_counts);
            let config = load_config(config.as_deref(), seed, extent_x, extent_z);
            run_generate(grid, config, output, name, format, wireframe);
        }
        Commands::Info {
            width,
            height,
            vertex_counts,
        } => {
            run_info(grid_from_args(width, height, vertex_counts));
        }
        Commands::DumpConfig { seed, config } => {
            let config = load_config(config.as_deref(), Some(seed), None, None);
            match serde_json::to_string_pretty(&config) {
                Ok(text) => println!("{}", text),
                Err(e) => fail(format!("Error serializing configuration: {}", e)),
            }
        }
    }
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn grid_from_args(width: u32, height: u32, vertex_counts: bool) -> GridConfig {
    if vertex_counts {
        GridConfig::from_vertex_counts(width, height)
    } else {
        GridConfig::new(width, height)
    }
}

/// Builds the terrain configuration from an optional file plus flag overrides.
///
/// Without a file or an explicit seed the seed is taken from the clock.
fn load_config(
    path: Option<&Path>,
    seed: Option<u64>,
    extent_x: Option<f32>,
    extent_z: Option<f32>,
) -> TerrainConfig {
    let mut config = match path {
        Some(path) => TerrainConfig::from_json_file(path).unwrap_or_else(|e| {
            fail(format!("Error loading config {}: {}", path.display(), e))
        }),
        None => TerrainConfig::default(),
    };

    match (seed, path) {
        (Some(seed), _) => config.seed = Seed(seed),
        (None, Some(_)) => {}
        (None, None) => {
            config.seed = Seed::from_time().unwrap_or_else(|e| fail(format!("Error: {}", e)));
        }
    }

    if let Some(x) = extent_x {
        config.extent[0] = x;
    }
    if let Some(z) = extent_z {
        config.extent[1] = z;
    }

    config
}

fn run_generate(
    grid: GridConfig,
    config: TerrainConfig,
    output: PathBuf,
    name: String,
    format: ExportFormat,
    wireframe: bool,
) {
    println!("Heightfield - Procedural Terrain Generator");
    println!("==========================================");
    println!("Grid: {}x{} cells", grid.width, grid.height);
    println!("Extent: {} x {}", config.extent[0], config.extent[1]);
    println!("Octaves: {}", config.fbm.octaves.len());
    println!("Seed: {}", config.seed);
    println!("Output: {}", output.display());

    let service = HeightfieldService::new(config)
        .unwrap_or_else(|e| fail(format!("Error: {}", e)));

    let start = Instant::now();
    println!("\nBuilding mesh...");
    let mesh = service
        .generate(grid)
        .unwrap_or_else(|e| fail(format!("Error during generation: {}", e)));
    println!("Generation completed in {:.2?}", start.elapsed());

    let (min_h, max_h) = mesh.elevation_range();
    println!(
        "Vertices: {}, triangles: {}, edges: {}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.edge_count()
    );
    println!("Height range: [{:.4}, {:.4}]", min_h, max_h);

    println!("\nExporting...");
    let export_start = Instant::now();

    std::fs::create_dir_all(&output)
        .unwrap_or_else(|e| fail(format!("Error creating output directory: {}", e)));
    let path = output.join(format!("{}.{}", name, format.extension()));

    let result = match format {
        ExportFormat::Obj => {
            let options = ObjExportOptions {
                wireframe,
                ..Default::default()
            };
            export_mesh_obj(&mesh, &path, &options).map_err(|e| e.to_string())
        }
        ExportFormat::Json => export_mesh_json(&mesh, &path).map_err(|e| e.to_string()),
        ExportFormat::Png => {
            let options = PngExportOptions::auto_range(&mesh);
            export_mesh_png(&mesh, &path, &options).map_err(|e| e.to_string())
        }
        ExportFormat::Raw => {
            let max = if max_h > min_h { max_h } else { min_h + 1e-6 };
            export_mesh_raw(&mesh, &path, RawFormat::R16LittleEndian, min_h, max)
                .map_err(|e| e.to_string())
        }
        ExportFormat::RawFloat => {
            export_mesh_raw(&mesh, &path, RawFormat::R32Float, min_h, max_h)
                .map_err(|e| e.to_string())
        }
    };

    if let Err(e) = result {
        fail(format!("Error exporting {}: {}", path.display(), e));
    }

    if wireframe && !matches!(format, ExportFormat::Obj) {
        println!("  Note: --wireframe only applies to OBJ export");
    }
    println!("  Exported {}", path.display());
    println!("Export completed in {:.2?}", export_start.elapsed());
}

fn run_info(grid: GridConfig) {
    if let Err(e) = grid.validate() {
        fail(format!("Error: {}", e));
    }

    let vertices = grid.vertex_count();
    let triangles = grid.triangle_count();
    let edges = grid.edge_count();

    println!("Heightfield Mesh Information");
    println!("============================");
    println!("Grid: {}x{} cells", grid.width, grid.height);
    println!("Vertices: {} ({}x{})", vertices, grid.columns(), grid.rows());
    println!("Triangles: {}", triangles);
    println!("Wireframe edges: {}", edges);

    let position_bytes = vertices * 12;
    let index_bytes = triangles * 12;
    let edge_bytes = edges * 8;
    println!("\nBuffer sizes:");
    println!("  Positions: {:.2} MB", position_bytes as f64 / 1_048_576.0);
    println!("  Indices:   {:.2} MB", index_bytes as f64 / 1_048_576.0);
    println!("  Edges:     {:.2} MB", edge_bytes as f64 / 1_048_576.0);
}
