use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, results};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PumpSelectorApp {
    pub state: AppState,
}

impl PumpSelectorApp {
    /// Build the app and load the configured catalog and curve sources.
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(config);
        state.reload();
        Self { state }
    }
}

impl eframe::App for PumpSelectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: search form ----
        egui::SidePanel::left("search_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom: curve comparison ----
        egui::TopBottomPanel::bottom("curve_panel")
            .default_height(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                plot::curve_plot(ui, &self.state);
            });

        // ---- Central panel: ranked results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results::results_table(ui, &mut self.state);
        });
    }
}
