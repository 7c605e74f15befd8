mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;
mod units;

use app::PumpSelectorApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load_or_default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Pump Selector",
        options,
        Box::new(move |_cc| Ok(Box::new(PumpSelectorApp::new(config)))),
    )
}
