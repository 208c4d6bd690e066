mod app;
mod convert;
mod paint;
mod panels;

use std::path::PathBuf;

use crossprint_core::config::EditorConfig;

const CONFIG_ENV: &str = "CROSSPRINT_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "crossprint.toml";

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = EditorConfig::load_or_default(&config_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true)
            .with_title("CrossPrint"),
        ..Default::default()
    };

    eframe::run_native(
        "CrossPrint",
        options,
        Box::new(move |cc| {
            let app = app::CrossPrintApp::new(&cc.egui_ctx, config)?;
            Ok(Box::new(app))
        }),
    )
}
