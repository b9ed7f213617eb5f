use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use indicatif::{ParallelProgressIterator, ProgressStyle};
use log::{debug, info, warn, LevelFilter};
use palette::{FromColor, Hsv, Srgb};
use planet_common::{Canvas, SimulationConfig, Snapshot, Vector2};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Command-line arguments for the visualizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input snapshot file path (.bin for bincode, .json for JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the PNG frames
    #[arg(short, long, default_value = "frames")]
    output: PathBuf,

    /// Width of the output frames in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Height of the output frames in pixels (calculated from aspect ratio if not provided)
    #[arg(long)]
    height: Option<u32>,

    /// Optional path to the config.toml file to get exact world dimensions
    #[arg(long)]
    config: Option<PathBuf>,

    /// World width (used if config is not provided)
    #[arg(long, default_value_t = 1200.0)]
    world_width: f64,

    /// World height (used if config is not provided)
    #[arg(long, default_value_t = 700.0)]
    world_height: f64,

    /// Body color - use "palette" for one color per body, or a specific color name
    /// (black, white, red, green, blue, yellow, cyan, magenta)
    #[arg(long, default_value = "palette")]
    color: String,

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

/// Parse a color name to RGBA values
fn parse_color(color_name: &str) -> [u8; 4] {
    for &(name, color) in COLOR_MAP {
        if name.eq_ignore_ascii_case(color_name) {
            return color;
        }
    }
    // Default to black if color not found
    warn!("Color '{}' not recognized, using black.", color_name);
    [0, 0, 0, 255]
}

/// Generate a color palette with a specified number of colors.
/// Hues are spread by the golden angle so neighbouring ids look different.
fn generate_color_palette(count: usize) -> Vec<[u8; 4]> {
    (0..count)
        .map(|i| {
            let hue = (i as f32 * 137.508) % 360.0;
            let rgb = Srgb::from_color(Hsv::new(hue, 0.75, 0.8));
            [
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
                255,
            ]
        })
        .collect()
}

/// A frame being drawn, mapping world coordinates to pixels.
/// World and image share the screen convention: origin top-left, y down.
struct ImageCanvas {
    image: RgbaImage,
    background: Rgba<u8>,
    pen: Rgba<u8>,
    pixels_per_unit: f64,
}

impl ImageCanvas {
    fn new(width: u32, height: u32, pixels_per_unit: f64, bg_color: [u8; 4]) -> Self {
        let background = Rgba(bg_color);
        ImageCanvas {
            image: ImageBuffer::from_pixel(width, height, background),
            background,
            pen: Rgba([0, 0, 0, 255]),
            pixels_per_unit,
        }
    }

    fn set_pen(&mut self, color: [u8; 4]) {
        self.pen = Rgba(color);
    }

    fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl Canvas for ImageCanvas {
    fn clear(&mut self) {
        let background = self.background;
        self.image.pixels_mut().for_each(|p| *p = background);
    }

    fn draw_circle(&mut self, center: Vector2, radius: f64, fixed: bool) {
        let cx = (center.x * self.pixels_per_unit).round() as i32;
        let cy = (center.y * self.pixels_per_unit).round() as i32;
        let r = ((radius * self.pixels_per_unit).round() as i32).max(1);
        if fixed {
            draw_filled_circle_mut(&mut self.image, (cx, cy), r, self.pen);
        } else {
            draw_hollow_circle_mut(&mut self.image, (cx, cy), r, self.pen);
        }
    }
}

/// Draw a snapshot frame
fn draw_frame(
    snapshot: &Snapshot,
    width: u32,
    height: u32,
    pixels_per_unit: f64,
    bg_color: [u8; 4],
    color_palette: &[[u8; 4]],
) -> RgbaImage {
    let mut canvas = ImageCanvas::new(width, height, pixels_per_unit, bg_color);
    canvas.clear();
    for body in &snapshot.bodies {
        let color_idx = body.id as usize % color_palette.len();
        canvas.set_pen(color_palette[color_idx]);
        canvas.draw_circle(Vector2::new(body.position.0, body.position.1), body.radius, body.fixed);
    }
    canvas.into_image()
}

/// Reads recorded snapshots; the format is picked from the file extension.
fn read_snapshots(path: &Path) -> Result<Vec<Snapshot>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let snapshots = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse JSON snapshots from {}", path.display()))?,
        Some("bin") => bincode::deserialize_from(reader)
            .with_context(|| format!("Failed to parse bincode snapshots from {}", path.display()))?,
        other => anyhow::bail!(
            "Unsupported snapshot file extension {:?} (expected .json or .bin)",
            other
        ),
    };
    Ok(snapshots)
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    run_with_args(args)
}

fn run_with_args(args: Args) -> Result<()> {
    // Initialize logger
    let _ = Builder::from_default_env()
        .filter(None, LevelFilter::Info)
        .try_init();

    info!("Starting Planet Visualizer...");
    info!("Input file: {}", args.input.display());
    info!("Output directory: {}", args.output.display());

    // --- Determine Simulation World Dimensions ---
    let (world_width, world_height) = if let Some(config_path) = &args.config {
        match SimulationConfig::load(config_path) {
            Ok(config) => {
                info!("Loaded world dimensions from {}", config_path.display());
                let params = config.get_sim_params();
                (params.world_width, params.world_height)
            }
            Err(e) => {
                warn!(
                    "Failed to load config file '{}': {}. Using provided dimensions.",
                    config_path.display(),
                    e
                );
                (args.world_width, args.world_height)
            }
        }
    } else {
        info!("Using provided world dimensions.");
        (args.world_width, args.world_height)
    };

    if !(world_width > 0.0 && world_height > 0.0) {
        anyhow::bail!("World dimensions must be positive (got {} x {}).", world_width, world_height);
    }
    info!("Simulation world size: {:.1} x {:.1}", world_width, world_height);

    // --- Calculate Output Dimensions and Scale ---
    let output_width_px = args.width;
    let aspect_ratio = world_width / world_height;
    let output_height_px = args
        .height
        .unwrap_or_else(|| (output_width_px as f64 / aspect_ratio).round() as u32);

    let scale_x = output_width_px as f64 / world_width;
    let scale_y = output_height_px as f64 / world_height;
    let pixels_per_unit = scale_x.min(scale_y); // Use smaller scale to ensure everything fits

    info!("Output frame dimensions: {}x{} px", output_width_px, output_height_px);
    debug!("Scale: {:.4} pixels per world unit", pixels_per_unit);

    // --- Load Snapshots ---
    let snapshots = read_snapshots(&args.input)?;
    info!("Found {} snapshots in the file", snapshots.len());
    if snapshots.is_empty() {
        warn!("Input file contains no snapshots. Exiting.");
        return Ok(());
    }

    // --- Set up Colors ---
    let bg_color = parse_color(&args.bg_color);
    let color_palette: Vec<[u8; 4]> = if args.color.eq_ignore_ascii_case("palette") {
        let max_id = snapshots
            .iter()
            .flat_map(|s| s.bodies.iter().map(|b| b.id))
            .max()
            .unwrap_or(0);
        info!("Using color palette mode for body coloring");
        generate_color_palette(max_id as usize + 1)
    } else {
        let single_color = parse_color(&args.color);
        info!("Using single color for all bodies: {:?}", single_color);
        vec![single_color]
    };

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory {}", args.output.display()))?;

    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({percent}%) [{eta}]")
        .context("Invalid progress bar template")?
        .progress_chars("#>-");

    let start_time = Instant::now();

    // Frames are independent, render and write them in parallel
    snapshots
        .par_iter()
        .progress_with_style(style)
        .try_for_each(|snapshot| -> Result<()> {
            let image = draw_frame(
                snapshot,
                output_width_px,
                output_height_px,
                pixels_per_unit,
                bg_color,
                &color_palette,
            );
            let frame_path = args.output.join(format!("frame_{:06}.png", snapshot.step));
            image
                .save(&frame_path)
                .with_context(|| format!("Failed to write frame {}", frame_path.display()))?;
            Ok(())
        })?;

    let duration = start_time.elapsed();
    info!(
        "Rendered {} frames in {:.2?} ({:.1} frames per second)",
        snapshots.len(),
        duration,
        snapshots.len() as f64 / duration.as_secs_f64().max(1e-9)
    );
    info!("Frames saved to: {}", args.output.display());

    Ok(())
}
