use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, LevelFilter};
use rayon::prelude::*;
use simulation_common::{load_snapshots, SimulationConfig, Snapshot, TokenRenderer, TokenView};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Command-line arguments for the visualizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input snapshot file path (.json, .bin or .msgpack)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory the PNG frames are written to
    #[arg(short, long, default_value = "frames")]
    output_dir: PathBuf,

    /// Width (and height) of every frame in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Optional path to the config.toml file to get the exact surface size and radius
    #[arg(long)]
    config: Option<PathBuf>,

    /// Surface side length (used if config is not provided)
    #[arg(long, default_value_t = 800.0)]
    surface_size: f32,

    /// Token radius (used if config is not provided)
    #[arg(long, default_value_t = 30.0)]
    radius: f32,

    /// Background color - name of the color for the background
    #[arg(long, default_value = "white")]
    bg_color: String,
}

// Color definitions for named colors (RGBA format)
const COLOR_MAP: &[(&str, [u8; 4])] = &[
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 255, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
];

const OUTLINE_COLOR: Rgba<u8> = Rgba([64, 64, 64, 255]);

/// Parse a color name to RGBA values
fn parse_color(color_name: &str) -> [u8; 4] {
    for &(name, color) in COLOR_MAP {
        if name.eq_ignore_ascii_case(color_name) {
            return color;
        }
    }
    // Default to white if color not found
    warn!("Color '{}' not recognized, using white.", color_name);
    [255, 255, 255, 255]
}

/// Draws tokens onto one frame, scaling surface coordinates to pixels.
struct FramePainter {
    image: RgbaImage,
    pixels_per_unit: f32,
}

impl FramePainter {
    fn new(width: u32, pixels_per_unit: f32, bg_color: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, width, Rgba(bg_color)),
            pixels_per_unit,
        }
    }
}

impl TokenRenderer for FramePainter {
    fn render_token(&mut self, token: &TokenView) {
        // Surface origin is the top-left corner, like the image.
        let px = (token.position.x * self.pixels_per_unit).round() as i32;
        let py = (token.position.y * self.pixels_per_unit).round() as i32;
        let radius_px = (token.radius * self.pixels_per_unit).round().max(1.0) as i32;

        draw_filled_circle_mut(&mut self.image, (px, py), radius_px, Rgba(token.kind.color()));
        draw_hollow_circle_mut(&mut self.image, (px, py), radius_px, OUTLINE_COLOR);
    }
}

/// Draw a snapshot frame
fn draw_frame(snapshot: &Snapshot, width: u32, surface_size: f32, radius: f32, bg_color: [u8; 4]) -> RgbaImage {
    let mut painter = FramePainter::new(width, width as f32 / surface_size, bg_color);
    snapshot.replay(radius, &mut painter);
    painter.image
}

fn frame_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("frame_{:05}.png", index))
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    // Initialize logger (tests may run this more than once per process)
    let _ = Builder::from_default_env().filter(None, LevelFilter::Info).try_init();

    info!("Starting Simulation Visualizer...");
    info!("Input file: {}", args.input.display());
    info!("Output directory: {}", args.output_dir.display());

    // --- Determine Surface Dimensions ---
    let (surface_size, radius) = if let Some(config_path) = &args.config {
        match SimulationConfig::load(config_path) {
            Ok(config) => {
                info!("Loaded surface dimensions from {}", config_path.display());
                let params = config.get_sim_params();
                (params.surface_size, params.radius)
            }
            Err(e) => {
                warn!(
                    "Failed to load config file '{}': {}. Using provided dimensions.",
                    config_path.display(),
                    e
                );
                (args.surface_size, args.radius)
            }
        }
    } else {
        info!("Using provided surface dimensions.");
        (args.surface_size, args.radius)
    };
    if surface_size <= 0.0 || radius <= 0.0 || args.width == 0 {
        anyhow::bail!("surface size, radius and width must all be positive.");
    }
    info!("Surface {:.1} x {:.1}, token radius {:.1}, frames {}x{} px", surface_size, surface_size, radius, args.width, args.width);

    let bg_color = parse_color(&args.bg_color);

    // --- Load Snapshots ---
    let snapshots = load_snapshots(&args.input)?;
    info!("Found {} snapshots in the file", snapshots.len());
    if snapshots.is_empty() {
        warn!("Input file contains no snapshots. Exiting.");
        return Ok(());
    }
    let with_tokens = snapshots.iter().filter(|s| s.tokens.is_some()).count();
    if with_tokens == 0 {
        warn!("No snapshots contain token positions! Every frame will be blank.");
        warn!("Set output.save_tokens_in_snapshot = true in the simulation config.");
    }

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory: {}", args.output_dir.display()))?;

    // Set up progress bar
    let progress_bar = ProgressBar::new(snapshots.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({percent}%) [{eta}]")?
            .progress_chars("#>-"),
    );

    let start_time = Instant::now();
    snapshots.par_iter().enumerate().try_for_each(|(index, snapshot)| -> Result<()> {
        let frame = draw_frame(snapshot, args.width, surface_size, radius, bg_color);
        let path = frame_path(&args.output_dir, index);
        frame
            .save(&path)
            .with_context(|| format!("Failed to write frame {}", path.display()))?;
        progress_bar.inc(1);
        Ok(())
    })?;
    progress_bar.finish_with_message("done");

    let duration = start_time.elapsed();
    info!(
        "Rendered {} frames in {:.2?} ({:.1} frames per second)",
        snapshots.len(),
        duration,
        snapshots.len() as f64 / duration.as_secs_f64().max(1e-9)
    );
    if let Some(last) = snapshots.last() {
        info!("Final snapshot at step {}: {}", last.step, last.kind_counts);
    }
    info!("Frames saved to: {}", args.output_dir.display());

    Ok(())
}
