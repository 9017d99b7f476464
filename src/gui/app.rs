use eframe::egui;
use png2jpg::color::BackgroundChoice;
use png2jpg::config::{DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
use png2jpg::conversion::{ConversionEvent, ConversionSummary};
use png2jpg::report::{LineKind, LogLine};
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use strum::IntoEnumIterator;

#[path = "app_processing.rs"]
mod app_processing;

pub struct ConverterApp {
    // Input/Output paths
    input_path: String,
    output_path: String,

    // Conversion settings
    quality: u8,
    recursive: bool,
    background: BackgroundChoice,
    custom_background: String,

    // Processing state
    is_processing: bool,
    progress: f32,
    processed_count: usize,
    total_count: usize,
    cancel_flag: Option<Arc<AtomicBool>>,

    // Status log and dialogs
    log: Vec<LogLine>,
    dialog: Option<Dialog>,

    // Communication channel for background processing
    progress_receiver: Option<Receiver<WorkerMessage>>,
}

/// Messages from the conversion worker to the UI thread
#[derive(Debug)]
pub(crate) enum WorkerMessage {
    Event(ConversionEvent),
    Finished(ConversionSummary),
    Failed(String),
}

/// Modal message shown on top of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Dialog {
    title: String,
    message: String,
    is_error: bool,
}

impl Dialog {
    pub(crate) fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            is_error: false,
        }
    }

    pub(crate) fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            is_error: true,
        }
    }
}

impl ConverterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::idle()
    }

    fn idle() -> Self {
        let mut app = Self {
            input_path: String::new(),
            output_path: String::new(),
            quality: DEFAULT_QUALITY,
            recursive: false,
            background: BackgroundChoice::White,
            custom_background: "255,255,255".to_string(),
            is_processing: false,
            progress: 0.0,
            processed_count: 0,
            total_count: 0,
            cancel_flag: None,
            log: Vec::new(),
            dialog: None,
            progress_receiver: None,
        };
        app.log_info("Ready to convert...");
        app
    }

    pub(crate) fn log_info(&mut self, text: impl Into<String>) {
        self.log.push(LogLine {
            kind: LineKind::Info,
            text: text.into(),
        });
    }

    fn can_convert(&self) -> bool {
        !self.is_processing && !self.input_path.is_empty() && !self.output_path.is_empty()
    }

    fn render_file_selection(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("folders")
            .num_columns(3)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Input Folder:");
                ui.text_edit_singleline(&mut self.input_path);
                if ui.button("Browse...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .set_title("Select Input Folder")
                        .pick_folder()
                    {
                        self.input_path = path.display().to_string();
                        self.log_info(format!("Input folder selected: {}", self.input_path));
                    }
                }
                ui.end_row();

                ui.label("Output Folder:");
                ui.text_edit_singleline(&mut self.output_path);
                if ui.button("Browse...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .set_title("Select Output Folder")
                        .pick_folder()
                    {
                        self.output_path = path.display().to_string();
                        self.log_info(format!("Output folder selected: {}", self.output_path));
                    }
                }
                ui.end_row();
            });

        ui.add_space(10.0);
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Quality:");
            ui.add(egui::Slider::new(&mut self.quality, MIN_QUALITY..=MAX_QUALITY));
        });

        ui.checkbox(&mut self.recursive, "Include subfolders (recursive)");
        ui.add_space(5.0);

        ui.group(|ui| {
            ui.label("Background for transparent PNGs");
            ui.horizontal(|ui| {
                for choice in BackgroundChoice::iter() {
                    ui.radio_value(&mut self.background, choice, choice.to_string());
                }
                ui.add_enabled(
                    self.background == BackgroundChoice::Custom,
                    egui::TextEdit::singleline(&mut self.custom_background).desired_width(90.0),
                );
                ui.label("(R,G,B)");
            });
        });

        ui.add_space(10.0);
    }

    fn render_log(&mut self, ui: &mut egui::Ui) {
        ui.label("Status");
        ui.group(|ui| {
            egui::ScrollArea::vertical()
                .max_height(220.0)
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &self.log {
                        match line.kind {
                            LineKind::Info => {
                                ui.label(&line.text);
                            }
                            LineKind::Warning => {
                                ui.colored_label(
                                    egui::Color32::YELLOW,
                                    format!("Warning: {}", line.text),
                                );
                            }
                            LineKind::Error => {
                                ui.colored_label(
                                    egui::Color32::RED,
                                    format!("Error: {}", line.text),
                                );
                            }
                        }
                    }
                });
        });

        ui.add_space(10.0);
    }

    fn render_progress(&mut self, ui: &mut egui::Ui) {
        if self.is_processing {
            ui.label(format!(
                "Processing: {}/{}",
                self.processed_count, self.total_count
            ));
            let progress_bar = egui::ProgressBar::new(self.progress)
                .show_percentage()
                .animate(true);
            ui.add(progress_bar);
        }
    }

    fn render_buttons(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let button_text = if self.is_processing {
                "Converting..."
            } else {
                "Convert"
            };
            let button = egui::Button::new(button_text).min_size(egui::vec2(160.0, 32.0));
            if ui.add_enabled(self.can_convert(), button).clicked() {
                self.start_processing();
            }

            if self.is_processing && ui.button("Cancel").clicked() {
                self.request_cancel();
            }
        });
    }

    fn render_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &self.dialog else {
            return;
        };

        let mut close = false;
        egui::Window::new(dialog.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if dialog.is_error {
                    ui.colored_label(egui::Color32::RED, &dialog.message);
                } else {
                    ui.label(&dialog.message);
                }
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    close = true;
                }
            });

        if close {
            self.dialog = None;
        }
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for progress updates from background thread
        self.check_progress();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("PNG to JPEG Batch Converter");
            });
            ui.add_space(15.0);

            self.render_file_selection(ui);
            self.render_settings(ui);
            self.render_log(ui);
            self.render_progress(ui);
            self.render_buttons(ui);
        });

        self.render_dialog(ctx);

        // Request repaint if processing
        if self.is_processing {
            ctx.request_repaint();
        }
    }
}
