// Library exports for reuse by the CLI and GUI binaries
pub mod cli;
pub mod color;
pub mod config;
pub mod conversion;
pub mod error;
pub mod json_output;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use color::{parse_rgb, BackgroundChoice};
pub use config::{parse_quality, ConversionConfig};
pub use conversion::{
    run, ConversionEngine, ConversionEvent, ConversionOutcome, ConversionSummary, FileEvent,
};
pub use error::{ConfigError, FileError};
pub use json_output::JsonMessage;
