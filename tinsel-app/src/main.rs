//! Tinsel Application
//!
//! Headless driver for the gesture-driven photo tree.
//!
//! Features:
//! - Replays recorded hand landmarks, or a built-in demo gesture script
//! - Renders at a fixed frame rate decoupled from the hand sampling rate
//! - Logs every mode change and prints a summary of the final scene

mod app;
mod config;
mod demo;

use app::{LoggingConfig, SimulationBuilder};
use clap::Parser;
use config::AppError;
use std::path::PathBuf;
use tinsel_engine::EngineConfig;

/// Tinsel - Gesture-Driven Photo Tree
#[derive(Parser, Debug)]
#[command(name = "tinsel")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines landmark recording to replay instead of the demo script
    #[arg(short, long)]
    recording: Option<PathBuf>,

    /// Photo reference to hang on the tree (repeatable)
    #[arg(short, long = "photo")]
    photos: Vec<String>,

    /// JSON engine config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to render
    #[arg(long, default_value_t = 720)]
    frames: usize,

    /// Render frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Hand sampling rate when the source does not declare one
    #[arg(long, default_value_t = 30.0)]
    camera_fps: f32,

    /// Viewport width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Random seed for layout and focus selection
    #[arg(long)]
    seed: Option<u64>,

    /// Turn the tree about its axis, radians per second
    #[arg(long, default_value_t = 0.0)]
    tree_spin: f32,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Send spans to Tracy (requires the `tracy` feature)
    #[arg(long)]
    tracy: bool,
}

fn build(args: Args) -> Result<SimulationBuilder, AppError> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let (width, height) = config.viewport;
    config.viewport = (args.width.unwrap_or(width), args.height.unwrap_or(height));

    let mut builder = SimulationBuilder::new()
        .with_config(config)
        .with_frames(args.frames)
        .with_fps(args.fps)
        .with_camera_fps(args.camera_fps)
        .with_tree_spin(args.tree_spin)
        .with_logging(LoggingConfig {
            level: args.log_level,
            enable_tracy: args.tracy,
        });

    builder = match args.recording {
        Some(path) => builder.with_recording(path).with_photos(args.photos),
        None if args.photos.is_empty() => builder.with_photos(demo::DEMO_PHOTOS),
        None => builder.with_photos(args.photos),
    };
    Ok(builder)
}

fn main() {
    let args = Args::parse();

    match build(args).and_then(SimulationBuilder::run) {
        Ok(summary) => print!("{}", summary),
        Err(e) => {
            eprintln!("Application error: {}", e);
            std::process::exit(1);
        }
    }
}
