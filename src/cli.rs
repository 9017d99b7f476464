use clap::Parser;
use std::path::PathBuf;

use crate::color::parse_rgb;
use crate::config::{parse_quality, ConversionConfig};
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(
    name = "png2jpg",
    version,
    about = "Batch convert PNG images to JPEG format with configurable quality",
    long_about = "
PNG to JPEG Batch Converter

Converts every PNG in a directory to JPEG. Transparent images are flattened
onto a background color. Files are processed one at a time; a file that
cannot be converted is reported and the batch continues.

Example Usage:
  # Basic conversion with default quality (85)
  png2jpg -i ./input_images -o ./output_images

  # Conversion with custom quality
  png2jpg -i ./input_images -o ./output_images -q 90

  # Recursive conversion including subdirectories
  png2jpg -i ./photos -o ./converted -q 80 -r

  # Black background for transparent PNGs
  png2jpg -i ./input -o ./output -b 0,0,0

  # Machine-readable progress
  png2jpg -i ./input -o ./output --json-progress"
)]
pub struct Args {
    /// Input directory containing PNG files
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Output directory for JPEG files (created if it doesn't exist)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// JPEG quality 1-100
    #[arg(
        short = 'q',
        long = "quality",
        default_value_t = 85,
        value_name = "QUALITY",
        allow_negative_numbers = true
    )]
    pub quality: i64,

    /// Process subdirectories recursively
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// RGB background color for transparent PNGs as comma-separated values
    #[arg(
        short = 'b',
        long = "background",
        default_value = "255,255,255",
        value_name = "R,G,B"
    )]
    pub background: String,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Show a progress bar on stderr while converting
    #[arg(long = "progress")]
    pub progress: bool,

    /// Print a table with the result of every file after the summary
    #[arg(long = "report")]
    pub report: bool,

    /// Emit progress as JSON lines on stdout instead of text
    #[arg(long = "json-progress", conflicts_with_all = ["progress", "report"])]
    pub json_progress: bool,
}

impl Args {
    /// Turn the raw arguments into a conversion config
    ///
    /// Quality and background are checked here; directories are checked by
    /// the engine.
    pub fn to_config(&self) -> Result<ConversionConfig, ConfigError> {
        let quality = parse_quality(self.quality)?;
        let background = parse_rgb(&self.background)?;

        Ok(ConversionConfig::new(&self.input_dir, &self.output_dir)
            .with_quality(quality)
            .with_recursive(self.recursive)
            .with_background(background))
    }
}
