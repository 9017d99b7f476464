//! JSON output for scripting
//!
//! When --json-progress flag is enabled, every event and the final summary
//! are emitted as JSON lines to stdout, suppressing all other output.

use serde::Serialize;

use crate::config::ConversionConfig;
use crate::conversion::{ConversionEvent, ConversionSummary};

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage<'a> {
    /// Resolved configuration, emitted before the run starts
    Config(&'a ConversionConfig),
    /// Final counts and every per-file event
    Summary(&'a ConversionSummary),
    /// Configuration error that aborted the run
    Error { message: String },
}

impl JsonMessage<'_> {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        emit_line(self);
    }
}

/// Emit an engine event; events carry their own `type` tag
pub fn emit_event(event: &ConversionEvent) {
    emit_line(event);
}

fn emit_line<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        println!("{}", json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{ConversionOutcome, FileEvent};
    use serde_json::Value;
    use std::path::PathBuf;
    use std::time::Duration;

    fn parse<T: Serialize>(message: T) -> Value {
        serde_json::from_str(&serde_json::to_string(&message).unwrap()).unwrap()
    }

    #[test]
    fn test_config_line() {
        let config = ConversionConfig::new("in", "out");
        let value = parse(JsonMessage::Config(&config));
        assert_eq!(value["type"], "config");
        assert_eq!(value["quality"], 85);
        assert_eq!(value["input_dir"], "in");
    }

    #[test]
    fn test_event_lines_are_tagged() {
        let discovered = ConversionEvent::Discovered { candidates: 4 };
        let value = parse(&discovered);
        assert_eq!(value["type"], "discovered");
        assert_eq!(value["candidates"], 4);

        let file = ConversionEvent::File(FileEvent {
            source: PathBuf::from("in/a.png"),
            relative: PathBuf::from("a.png"),
            output: Some(PathBuf::from("out/a.jpg")),
            outcome: ConversionOutcome::Converted,
            elapsed: Duration::from_millis(5),
        });
        let value = parse(&file);
        assert_eq!(value["type"], "file");
        assert_eq!(value["relative"], "a.png");
        assert_eq!(value["outcome"]["status"], "converted");
    }

    #[test]
    fn test_summary_and_error_lines() {
        let summary = ConversionSummary::default();
        let value = parse(JsonMessage::Summary(&summary));
        assert_eq!(value["type"], "summary");
        assert_eq!(value["converted"], 0);
        assert_eq!(value["cancelled"], false);

        let value = parse(JsonMessage::Error {
            message: "Quality must be between 1 and 100, got: 0".to_string(),
        });
        assert_eq!(value["type"], "error");
        assert!(value["message"].as_str().unwrap().contains("Quality"));
    }
}
