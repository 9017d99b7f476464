use image::Rgb;
use strum_macros::{Display, EnumIter};

use crate::error::ConfigError;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Background presets offered by the GUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter)]
pub enum BackgroundChoice {
    #[default]
    White,
    Black,
    Custom,
}

impl BackgroundChoice {
    /// Resolve the choice to a color; `custom` is only parsed for [`BackgroundChoice::Custom`]
    pub fn resolve(self, custom: &str) -> Result<Rgb<u8>, ConfigError> {
        match self {
            BackgroundChoice::White => Ok(WHITE),
            BackgroundChoice::Black => Ok(BLACK),
            BackgroundChoice::Custom => parse_rgb(custom),
        }
    }
}

/// Parse an `R,G,B` triple such as `255, 255, 255`
///
/// Exactly three comma-separated integers in `0..=255`, whitespace allowed
/// around each value. Anything else is rejected as a whole.
pub fn parse_rgb(text: &str) -> Result<Rgb<u8>, ConfigError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ConfigError::background(
            text,
            format!("expected exactly 3 values, got {}", parts.len()),
        ));
    }

    let mut channels = [0u8; 3];
    for (channel, part) in channels.iter_mut().zip(&parts) {
        let value = part
            .parse::<i64>()
            .map_err(|_| ConfigError::background(text, format!("'{}' is not an integer", part)))?;
        *channel = u8::try_from(value).map_err(|_| {
            ConfigError::background(
                text,
                format!("color value must be between 0 and 255, got: {}", value),
            )
        })?;
    }

    Ok(Rgb(channels))
}

/// Format a color the way the CLI header echoes it, e.g. `RGB(255, 255, 255)`
pub fn format_rgb(color: Rgb<u8>) -> String {
    let [r, g, b] = color.0;
    format!("RGB({}, {}, {})", r, g, b)
}
