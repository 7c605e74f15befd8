use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::PumpField;
use crate::data::rank::SearchOutcome;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Ranked result table
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 20.0;

/// Render the ranked matches with a "compare" toggle per row.
pub fn results_table(ui: &mut Ui, state: &mut AppState) {
    let results = match &state.outcome {
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Enter a duty point and press Search");
            });
            return;
        }
        Some(SearchOutcome::NoMatches) => {
            ui.label(
                RichText::new("⚠ No pumps match your criteria. Try adjusting the parameters.")
                    .color(Color32::YELLOW),
            );
            return;
        }
        Some(SearchOutcome::Matches(results)) => results.clone(),
    };

    let has = |field| state.catalog.as_ref().is_some_and(|c| c.has(field));
    let show_particle = has(PumpField::ParticleSize);
    let show_power = has(PumpField::Power);
    let show_link = has(PumpField::ProductLink);

    let mut toggles: Vec<(String, bool)> = Vec::new();

    TableBuilder::new(ui)
        .id_salt("results")
        .striped(true)
        .resizable(true)
        .column(Column::auto())
        .column(Column::auto().at_least(90.0))
        .columns(Column::auto(), 6)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(ROW_HEIGHT, |mut header| {
            for title in [
                "Compare", "Model", "Category", "Hz", "Phase", "Flow (LPM)", "Head (m)",
                "Score", "Solids (mm)", "Power (kW)", "Link",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for result in &results {
                let pump = &result.pump;
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        let mut on = state.compare.contains(&pump.model);
                        if ui.checkbox(&mut on, "").changed() {
                            toggles.push((pump.model.clone(), on));
                        }
                    });
                    row.col(|ui| {
                        ui.label(pump.model.as_str());
                    });
                    row.col(|ui| {
                        ui.label(pump.category.as_str());
                    });
                    row.col(|ui| {
                        ui.label(format!("{}", pump.frequency_hz));
                    });
                    row.col(|ui| {
                        ui.label(format!("{}", pump.phase));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.0}", pump.rated_flow_lpm));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.1}", pump.rated_head_m));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.1}", result.match_score))
                            .on_hover_text("|Δflow| + |Δhead|, lower is closer");
                    });
                    row.col(|ui| {
                        if show_particle {
                            ui.label(optional(pump.particle_size_mm, 0));
                        }
                    });
                    row.col(|ui| {
                        if show_power {
                            ui.label(optional(pump.power_kw, 2));
                        }
                    });
                    row.col(|ui| {
                        if let (true, Some(url)) = (show_link, &pump.product_link) {
                            ui.hyperlink_to("🔗 View product", url);
                        }
                    });
                });
            }
        });

    for (model, on) in toggles {
        state.set_compared(&model, on);
    }
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(String::new, |v| format!("{v:.decimals$}"))
}
