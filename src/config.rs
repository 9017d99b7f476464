use image::Rgb;
use serde::Serialize;
use std::path::PathBuf;

use crate::color::WHITE;
use crate::error::ConfigError;

pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Settings for one conversion run
///
/// Built once by a front-end and handed to the engine, which validates it
/// before touching the filesystem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub quality: u8,
    pub recursive: bool,
    #[serde(serialize_with = "serialize_rgb")]
    pub background: Rgb<u8>,
}

impl ConversionConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            quality: DEFAULT_QUALITY,
            recursive: false,
            background: WHITE,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_background(mut self, background: Rgb<u8>) -> Self {
        self.background = background;
        self
    }

    /// Check everything that can be checked without writing to disk
    ///
    /// Background channels are `u8` so their range holds by construction;
    /// textual colors are range-checked by [`crate::color::parse_rgb`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(ConfigError::Quality(self.quality as i64));
        }

        if !self.input_dir.exists() {
            return Err(ConfigError::InputMissing(self.input_dir.clone()));
        }
        if !self.input_dir.is_dir() {
            return Err(ConfigError::InputNotDirectory(self.input_dir.clone()));
        }

        Ok(())
    }
}

/// Convert a raw quality value from the command line or a form field
pub fn parse_quality(value: i64) -> Result<u8, ConfigError> {
    u8::try_from(value)
        .ok()
        .filter(|q| (MIN_QUALITY..=MAX_QUALITY).contains(q))
        .ok_or(ConfigError::Quality(value))
}

fn serialize_rgb<S>(color: &Rgb<u8>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    color.0.serialize(serializer)
}
