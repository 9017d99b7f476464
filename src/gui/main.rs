// GUI entry point for png2jpg
// This binary provides a graphical interface for the batch converter

use eframe::egui;

mod app;
use app::ConverterApp;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PNG to JPEG Batch Converter")
            .with_inner_size([500.0, 550.0])
            .with_min_inner_size([400.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "PNG to JPEG Batch Converter",
        options,
        Box::new(|cc| Ok(Box::new(ConverterApp::new(cc)))),
    )
}
