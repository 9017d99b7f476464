//! Human-readable rendering of a run
//!
//! Both front-ends print the same lines: a header echoing the config, one
//! line per processed file, and a closing summary. `--report` adds a table.

use prettytable::{format, Cell, Row, Table};

use crate::color::format_rgb;
use crate::config::ConversionConfig;
use crate::conversion::{ConversionOutcome, ConversionSummary, FileEvent};
use crate::utils::format_duration;

pub const SEPARATOR_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Warning,
    Error,
}

/// One line of progress output, without styling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub kind: LineKind,
    pub text: String,
}

impl LogLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Lines echoing the resolved configuration
pub fn header_lines(config: &ConversionConfig) -> Vec<String> {
    vec![
        "Starting PNG to JPEG conversion...".to_string(),
        format!("Input directory: {}", config.input_dir.display()),
        format!("Output directory: {}", config.output_dir.display()),
        format!("Quality: {}", config.quality),
        format!("Recursive: {}", config.recursive),
        format!("Background color: {}", format_rgb(config.background)),
    ]
}

/// The progress line for one processed file
pub fn event_line(event: &FileEvent) -> LogLine {
    match &event.outcome {
        ConversionOutcome::Converted => LogLine::new(
            LineKind::Info,
            format!(
                "Converting: {} -> {}",
                event.source_name(),
                event.output_name().unwrap_or_default()
            ),
        ),
        ConversionOutcome::SkippedNotPng => LogLine::new(
            LineKind::Warning,
            format!("Skipping non-PNG file: {}", event.source.display()),
        ),
        ConversionOutcome::Failed(err) => LogLine::new(
            LineKind::Error,
            format!("{} - {}", event.source_name(), err),
        ),
    }
}

/// `Converted <n> files. <m> files skipped.`
///
/// Failed files count as skipped here; [`failure_line`] breaks them out.
pub fn summary_line(summary: &ConversionSummary) -> String {
    format!(
        "Converted {} files. {} files skipped.",
        summary.converted,
        summary.not_converted()
    )
}

pub fn failure_line(summary: &ConversionSummary) -> Option<String> {
    (summary.failed > 0).then(|| format!("{} files failed.", summary.failed))
}

/// Per-file table printed with `--report`
pub fn build_table(summary: &ConversionSummary) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.set_titles(Row::new(vec![
        Cell::new("#"),
        Cell::new("Input"),
        Cell::new("Output"),
        Cell::new("Result"),
        Cell::new("Time"),
    ]));

    for (i, event) in summary.events.iter().enumerate() {
        let (output, result) = match &event.outcome {
            ConversionOutcome::Converted => (
                event
                    .output
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                "converted".to_string(),
            ),
            ConversionOutcome::SkippedNotPng => ("-".to_string(), "skipped (not PNG)".to_string()),
            ConversionOutcome::Failed(err) => ("-".to_string(), format!("failed: {}", err)),
        };

        table.add_row(Row::new(vec![
            Cell::new(&(i + 1).to_string()),
            Cell::new(&event.relative.display().to_string()),
            Cell::new(&output),
            Cell::new(&result),
            Cell::new(&format_duration(event.elapsed)),
        ]));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;
    use image::Rgb;
    use std::path::PathBuf;
    use std::time::Duration;

    fn event(name: &str, outcome: ConversionOutcome) -> FileEvent {
        let output = match outcome {
            ConversionOutcome::SkippedNotPng => None,
            _ => Some(PathBuf::from("out").join(PathBuf::from(name).with_extension("jpg"))),
        };
        FileEvent {
            source: PathBuf::from("in").join(name),
            relative: PathBuf::from(name),
            output,
            outcome,
            elapsed: Duration::from_millis(3),
        }
    }

    fn sample_summary() -> ConversionSummary {
        let mut summary = ConversionSummary::default();
        summary.record(event("a.png", ConversionOutcome::Converted));
        summary.record(event("b.txt", ConversionOutcome::SkippedNotPng));
        summary.record(event(
            "c.png",
            ConversionOutcome::Failed(FileError::Decode("invalid signature".to_string())),
        ));
        summary
    }

    #[test]
    fn test_header_lines() {
        let config = ConversionConfig::new("photos", "converted")
            .with_quality(90)
            .with_recursive(true)
            .with_background(Rgb([0, 0, 0]));
        let lines = header_lines(&config);
        assert_eq!(lines[0], "Starting PNG to JPEG conversion...");
        assert_eq!(lines[1], "Input directory: photos");
        assert_eq!(lines[2], "Output directory: converted");
        assert_eq!(lines[3], "Quality: 90");
        assert_eq!(lines[4], "Recursive: true");
        assert_eq!(lines[5], "Background color: RGB(0, 0, 0)");
    }

    #[test]
    fn test_event_lines() {
        let summary = sample_summary();
        let lines: Vec<LogLine> = summary.events.iter().map(event_line).collect();

        assert_eq!(lines[0].kind, LineKind::Info);
        assert_eq!(lines[0].text, "Converting: a.png -> a.jpg");

        assert_eq!(lines[1].kind, LineKind::Warning);
        assert_eq!(
            lines[1].text,
            format!("Skipping non-PNG file: {}", PathBuf::from("in").join("b.txt").display())
        );

        assert_eq!(lines[2].kind, LineKind::Error);
        assert_eq!(lines[2].text, "c.png - decode error: invalid signature");
    }

    #[test]
    fn test_summary_lines() {
        let summary = sample_summary();
        assert_eq!(summary_line(&summary), "Converted 1 files. 2 files skipped.");
        assert_eq!(failure_line(&summary), Some("1 files failed.".to_string()));

        let empty = ConversionSummary::default();
        assert_eq!(summary_line(&empty), "Converted 0 files. 0 files skipped.");
        assert_eq!(failure_line(&empty), None);
    }

    #[test]
    fn test_build_table() {
        let table = build_table(&sample_summary());
        assert_eq!(table.len(), 3);
        let rendered = table.to_string();
        assert!(rendered.contains("a.png"));
        assert!(rendered.contains("skipped (not PNG)"));
        assert!(rendered.contains("failed: decode error: invalid signature"));
    }
}
