//! Error types for the converter
//!
//! Two tiers: [`ConfigError`] aborts a run before any file is touched,
//! [`FileError`] is recorded against a single file and the batch continues.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems detected before conversion starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Input directory does not exist: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("Input path is not a directory: {}", .0.display())]
    InputNotDirectory(PathBuf),

    #[error("Quality must be between 1 and 100, got: {0}")]
    Quality(i64),

    #[error("Invalid background color '{text}': {reason}. Use format: R,G,B (e.g., 255,255,255)")]
    Background { text: String, reason: String },

    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn background(text: &str, reason: impl Into<String>) -> Self {
        Self::Background {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Per-file failure, terminal for that file only
///
/// Messages are captured as strings so outcomes can be cloned across the
/// GUI channel and serialized for JSON output.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum FileError {
    #[error("read error: {0}")]
    Read(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("write error: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::Quality(0);
        assert_eq!(err.to_string(), "Quality must be between 1 and 100, got: 0");

        let err = ConfigError::background("1,2", "expected exactly 3 values, got 2");
        assert!(err.to_string().contains("'1,2'"));
        assert!(err.to_string().contains("expected exactly 3 values"));
    }

    #[test]
    fn test_file_error_serializes_with_kind() {
        let err = FileError::Decode("bad signature".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"kind":"decode","message":"bad signature"}"#);
    }
}
