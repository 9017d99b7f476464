// Processing implementation for the GUI
// The conversion runs on a worker thread and reports back over a channel

use super::{ConverterApp, Dialog, WorkerMessage};
use png2jpg::config::ConversionConfig;
use png2jpg::conversion::{ConversionEngine, ConversionEvent, ConversionSummary};
use png2jpg::report;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, TryRecvError};
use std::sync::Arc;

impl ConverterApp {
    pub fn start_processing(&mut self) {
        if self.input_path.is_empty() || self.output_path.is_empty() {
            self.dialog = Some(Dialog::error(
                "Validation Error",
                "Please select input and output folders",
            ));
            return;
        }

        let background = match self.background.resolve(&self.custom_background) {
            Ok(color) => color,
            Err(err) => {
                self.dialog = Some(Dialog::error("Validation Error", err.to_string()));
                return;
            }
        };

        let config = ConversionConfig::new(&self.input_path, &self.output_path)
            .with_quality(self.quality)
            .with_recursive(self.recursive)
            .with_background(background);

        // Clear previous state
        self.is_processing = true;
        self.progress = 0.0;
        self.processed_count = 0;
        self.total_count = 0;
        self.log.clear();
        self.log_info("Starting conversion...");
        for line in report::header_lines(&config).into_iter().skip(1) {
            self.log_info(line);
        }
        self.log_info(report::separator());

        let cancel_flag = Arc::new(AtomicBool::new(false));
        self.cancel_flag = Some(cancel_flag.clone());

        // Create channel for progress updates
        let (tx, rx) = channel();
        self.progress_receiver = Some(rx);

        // Directory checks happen on the worker, never on the UI thread
        std::thread::spawn(move || {
            let engine = match ConversionEngine::new(config) {
                Ok(engine) => engine.with_cancel_flag(cancel_flag),
                Err(err) => {
                    let _ = tx.send(WorkerMessage::Failed(err.to_string()));
                    return;
                }
            };

            let result = engine.run(|event| {
                let _ = tx.send(WorkerMessage::Event(event.clone()));
            });

            let message = match result {
                Ok(summary) => WorkerMessage::Finished(summary),
                Err(err) => WorkerMessage::Failed(err.to_string()),
            };
            let _ = tx.send(message);
        });
    }

    pub fn request_cancel(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::Relaxed);
            self.log_info("Cancelling after the current file...");
        }
    }

    /// Check for progress updates from the background thread
    pub fn check_progress(&mut self) {
        // Collect all messages in a vector first to avoid borrowing issues
        let mut messages = Vec::new();
        let mut disconnected = false;
        if let Some(ref receiver) = self.progress_receiver {
            loop {
                match receiver.try_recv() {
                    Ok(msg) => messages.push(msg),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        for msg in messages {
            self.handle_message(msg);
        }

        // Worker exited without a final message
        if disconnected && self.is_processing {
            self.handle_worker_lost();
        }
    }

    fn handle_worker_lost(&mut self) {
        self.finish_processing();
        let message = "The conversion stopped unexpectedly.";
        self.log.push(report::LogLine {
            kind: report::LineKind::Error,
            text: message.to_string(),
        });
        self.dialog = Some(Dialog::error("Conversion Error", message));
    }

    fn handle_message(&mut self, msg: WorkerMessage) {
        match msg {
            WorkerMessage::Event(ConversionEvent::Discovered { candidates }) => {
                self.total_count = candidates;
            }
            WorkerMessage::Event(ConversionEvent::File(file)) => {
                self.processed_count += 1;
                if self.total_count > 0 {
                    self.progress = self.processed_count as f32 / self.total_count as f32;
                }
                self.log.push(report::event_line(&file));
            }
            WorkerMessage::Finished(summary) => {
                self.finish_processing();
                self.log_summary(&summary);
                self.dialog = Some(Dialog::info(
                    "Conversion Complete",
                    completion_message(&summary),
                ));
            }
            WorkerMessage::Failed(err) => {
                self.finish_processing();
                self.log.push(report::LogLine {
                    kind: report::LineKind::Error,
                    text: err.clone(),
                });
                self.dialog = Some(Dialog::error("Configuration Error", err));
            }
        }
    }

    fn finish_processing(&mut self) {
        self.is_processing = false;
        self.cancel_flag = None;
        self.progress_receiver = None;
    }

    fn log_summary(&mut self, summary: &ConversionSummary) {
        self.log_info(report::separator());
        if summary.cancelled {
            self.log_info("Conversion cancelled.");
        }
        self.log_info(format!("Complete! {}", report::summary_line(summary)));
        if let Some(line) = report::failure_line(summary) {
            self.log_info(line);
        }
    }
}

fn completion_message(summary: &ConversionSummary) -> String {
    let mut message = report::summary_line(summary);
    if let Some(line) = report::failure_line(summary) {
        message.push('\n');
        message.push_str(&line);
    }
    if summary.cancelled {
        message.push_str("\nThe run was cancelled before all files were processed.");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_worker_ends_processing() {
        let mut app = ConverterApp::idle();
        app.input_path = "in".to_string();
        app.output_path = "out".to_string();
        let (tx, rx) = channel::<WorkerMessage>();
        app.progress_receiver = Some(rx);
        app.is_processing = true;
        drop(tx);

        app.check_progress();
        assert!(!app.is_processing);
        assert!(app.progress_receiver.is_none());
        assert!(app.dialog.as_ref().map(|d| d.is_error).unwrap_or(false));
        assert!(app.can_convert());
    }

    #[test]
    fn test_finished_then_disconnect_shows_summary() {
        let mut app = ConverterApp::idle();
        let (tx, rx) = channel();
        app.progress_receiver = Some(rx);
        app.is_processing = true;
        tx.send(WorkerMessage::Finished(ConversionSummary::default()))
            .unwrap();
        drop(tx);

        app.check_progress();
        assert!(!app.is_processing);
        let dialog = app.dialog.expect("completion dialog");
        assert!(!dialog.is_error);
        assert_eq!(dialog.title, "Conversion Complete");
    }
}
