pub mod codec;
pub mod discover;
pub mod flatten;

use log::{debug, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ConversionConfig;
use crate::error::{ConfigError, FileError};

pub use discover::{Candidate, FileTask};

/// Terminal result for one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Converted,
    SkippedNotPng,
    Failed(FileError),
}

/// One processed candidate, reported in processing order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEvent {
    pub source: PathBuf,
    pub relative: PathBuf,
    /// Where the JPEG was (or would have been) written; `None` for skips
    pub output: Option<PathBuf>,
    pub outcome: ConversionOutcome,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl FileEvent {
    /// File name of the source, for progress lines
    pub fn source_name(&self) -> String {
        display_name(&self.source)
    }

    pub fn output_name(&self) -> Option<String> {
        self.output.as_deref().map(display_name)
    }
}

/// Events emitted by [`ConversionEngine::run`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConversionEvent {
    /// Enumeration finished; sent once before any file event
    Discovered { candidates: usize },
    File(FileEvent),
}

/// Aggregate over every outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub events: Vec<FileEvent>,
    /// The run stopped early on request; remaining candidates have no event
    pub cancelled: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl ConversionSummary {
    pub fn record(&mut self, event: FileEvent) {
        match event.outcome {
            ConversionOutcome::Converted => self.converted += 1,
            ConversionOutcome::SkippedNotPng => self.skipped += 1,
            ConversionOutcome::Failed(_) => self.failed += 1,
        }
        self.events.push(event);
    }

    pub fn total(&self) -> usize {
        self.converted + self.skipped + self.failed
    }

    /// Candidates that produced no output file: non-PNG skips and failures
    pub fn not_converted(&self) -> usize {
        self.skipped + self.failed
    }

    pub fn failures(&self) -> impl Iterator<Item = (&FileEvent, &FileError)> {
        self.events.iter().filter_map(|event| match &event.outcome {
            ConversionOutcome::Failed(err) => Some((event, err)),
            _ => None,
        })
    }
}

/// Sequential PNG to JPEG conversion over a directory
pub struct ConversionEngine {
    config: ConversionConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl ConversionEngine {
    /// Validate `config` without touching the filesystem
    pub fn new(config: ConversionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: None,
        })
    }

    /// Stop between files once `flag` is set; the file in progress always finishes
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Run the whole batch, calling `on_event` synchronously for every event
    ///
    /// Only creating the output directory can fail here. Per-file problems
    /// are recorded in the summary and never abort the batch.
    pub fn run<F>(&self, mut on_event: F) -> Result<ConversionSummary, ConfigError>
    where
        F: FnMut(&ConversionEvent),
    {
        let start_time = Instant::now();
        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|source| ConfigError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let candidates = discover::discover_candidates(&self.config);
        on_event(&ConversionEvent::Discovered {
            candidates: candidates.len(),
        });

        let mut summary = ConversionSummary::default();
        for candidate in candidates {
            if self.is_cancelled() {
                debug!("Cancelled after {} of the candidates", summary.total());
                summary.cancelled = true;
                break;
            }

            let event = self.process_candidate(candidate);
            on_event(&ConversionEvent::File(event.clone()));
            summary.record(event);
        }

        summary.elapsed = start_time.elapsed();
        debug!(
            "Finished: {} converted, {} skipped, {} failed in {:?}",
            summary.converted, summary.skipped, summary.failed, summary.elapsed
        );
        Ok(summary)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    fn process_candidate(&self, candidate: Candidate) -> FileEvent {
        let start_time = Instant::now();
        let (source, relative, output, outcome) = match candidate {
            Candidate::Png(task) => {
                let outcome = match self.convert_file(&task) {
                    Ok(()) => ConversionOutcome::Converted,
                    Err(err) => {
                        warn!("Failed to convert {}: {}", task.source.display(), err);
                        ConversionOutcome::Failed(err)
                    }
                };
                (task.source, task.relative, Some(task.output), outcome)
            }
            Candidate::NotPng { path, relative } => {
                debug!("Skipping non-PNG file: {}", path.display());
                (path, relative, None, ConversionOutcome::SkippedNotPng)
            }
            Candidate::Unreadable {
                path,
                relative,
                error,
            } => {
                warn!("Cannot read {}: {}", path.display(), error);
                (path, relative, None, ConversionOutcome::Failed(FileError::Read(error)))
            }
        };

        FileEvent {
            source,
            relative,
            output,
            outcome,
            elapsed: start_time.elapsed(),
        }
    }

    /// Decode, flatten and encode a single file
    fn convert_file(&self, task: &FileTask) -> Result<(), FileError> {
        debug!(
            "Converting {} -> {}",
            task.source.display(),
            task.output.display()
        );
        let img = codec::decode(&task.source)?;
        let rgb = flatten::flatten(&img, self.config.background);
        drop(img);
        codec::write_jpeg(&rgb, &task.output, self.config.quality)
    }
}

/// Validate `config` and convert everything it names
pub fn run<F>(config: ConversionConfig, on_event: F) -> Result<ConversionSummary, ConfigError>
where
    F: FnMut(&ConversionEvent),
{
    ConversionEngine::new(config)?.run(on_event)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
