// cli.rs - Command-line interface configuration
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::core::PixelFormat;

#[derive(Parser, Debug, Clone)]
#[command(name = "sdf-marcher")]
#[command(about = "Multithreaded SDF ray-marching renderer", long_about = None)]
pub struct Cli {
    /// Render worker threads (defaults to the available parallelism)
    #[arg(short = 't', long)]
    pub threads: Option<NonZeroUsize>,

    /// JSON scene description; the built-in demo scene is used when omitted
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Surface width in pixels
    #[arg(long, default_value_t = 320)]
    pub width: usize,

    /// Surface height in pixels
    #[arg(long, default_value_t = 240)]
    pub height: usize,

    /// Number of frames to render
    #[arg(long, default_value_t = 1)]
    pub frames: u64,

    /// Camera input script, one key per frame (W A S D move, U/J up/down, Q/E turn, '.' idle)
    #[arg(long, default_value = "")]
    pub moves: String,

    /// Save the last frame as a PNG
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pixel layout of the render surface
    #[arg(long, value_enum, default_value_t = Format::Rgba)]
    pub format: Format,
}

impl Cli {
    /// Worker count, falling back to the machine's available parallelism.
    pub fn worker_count(&self) -> usize {
        self.threads
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Rgba,
    Bgra,
    Rgb,
}

impl From<Format> for PixelFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Rgba => PixelFormat::Rgba8888,
            Format::Bgra => PixelFormat::Bgra8888,
            Format::Rgb => PixelFormat::Rgb888,
        }
    }
}
