use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::data::derive::AutoField;
use crate::data::filter::Choice;
use crate::data::rank::{RankStrategy, MAX_DISPLAY_PERCENT, MIN_DISPLAY_PERCENT};
use crate::state::AppState;
use crate::units::{FlowUnit, HeadUnit};

// ---------------------------------------------------------------------------
// Left side panel – search form
// ---------------------------------------------------------------------------

/// Render the search form.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Pump Selection");
    ui.separator();

    let Some(catalog) = &state.catalog else {
        ui.label("No catalog loaded.");
        return;
    };
    let categories = catalog.categories.clone();
    let frequencies = catalog.frequencies.clone();
    let phases = catalog.phases.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let form = &mut state.form;

            // ---- Categorical selectors ----
            ui.strong("Frequency");
            egui::ComboBox::from_id_salt("frequency")
                .selected_text(choice_text(&form.frequency, "Show all", |f| format!("{f} Hz")))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut form.frequency, Choice::Any, "Show all");
                    for f in &frequencies {
                        ui.selectable_value(&mut form.frequency, Choice::Only(*f), format!("{f} Hz"));
                    }
                });

            ui.strong("Phase");
            egui::ComboBox::from_id_salt("phase")
                .selected_text(choice_text(&form.phase, "Show all", |p| format!("{p}Ø")))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut form.phase, Choice::Any, "Show all");
                    for p in &phases {
                        ui.selectable_value(&mut form.phase, Choice::Only(*p), format!("{p}Ø"));
                    }
                });

            ui.strong("Category");
            let before = form.category.clone();
            egui::ComboBox::from_id_salt("category")
                .selected_text(choice_text(&form.category, "All categories", |c| c.clone()))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut form.category, Choice::Any, "All categories");
                    for c in &categories {
                        ui.selectable_value(&mut form.category, Choice::Only(c.clone()), c.as_str());
                    }
                });
            let mut site_changed = before != form.category;
            ui.separator();

            // ---- Derived requirement inputs ----
            egui::CollapsingHeader::new(RichText::new("Site details").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    let booster = form.is_booster();
                    let site = &mut form.site;
                    if booster {
                        site_changed |= labelled(ui, "Floors", DragValue::new(&mut site.floors).range(0..=200));
                        site_changed |= labelled(ui, "Faucets", DragValue::new(&mut site.faucets).range(0..=500));
                    }
                    ui.label("Pond (m)");
                    ui.horizontal(|ui: &mut Ui| {
                        for v in [&mut site.pond.length_m, &mut site.pond.width_m, &mut site.pond.height_m] {
                            site_changed |= ui.add(non_negative(v, 0.1)).changed();
                        }
                    });
                    site_changed |= labelled(ui, "Drain time (h)", non_negative(&mut site.pond.drain_hours, 0.1));
                    site_changed |= labelled(ui, "Burial depth (m)", non_negative(&mut site.underground_depth_m, 0.1));
                });
            if site_changed {
                form.refresh_suggestions();
            }
            ui.separator();

            // ---- Flow / head ----
            ui.strong("Flow");
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for unit in FlowUnit::ALL {
                    if ui.radio_value(&mut form.flow_unit, unit, unit.label()).changed() {
                        form.refresh_suggestions();
                    }
                }
            });
            if auto_field(ui, &mut form.flow, form.flow_unit.label()) {
                form.reset_flow();
            }

            ui.strong("Total dynamic head (TDH)");
            ui.horizontal(|ui: &mut Ui| {
                for unit in HeadUnit::ALL {
                    if ui.radio_value(&mut form.head_unit, unit, unit.label()).changed() {
                        form.refresh_suggestions();
                    }
                }
            });
            if auto_field(ui, &mut form.head, form.head_unit.label()) {
                form.reset_head();
            }

            labelled(ui, "Solids (mm)", non_negative(&mut form.particle_size_mm, 1.0));
            ui.separator();

            // ---- Advanced ----
            ui.checkbox(&mut form.advanced, "Filter by power");
            if form.advanced {
                labelled(ui, "Min kW", non_negative(&mut form.power_min_kw, 0.05));
                labelled(ui, "Max kW", non_negative(&mut form.power_max_kw, 0.05));
                if form.power_min_kw > form.power_max_kw {
                    ui.label(RichText::new("Min is above max").color(Color32::YELLOW));
                }
            }
            ui.separator();

            // ---- Ranking ----
            ui.strong("Sort by");
            egui::ComboBox::from_id_salt("ranking")
                .selected_text(form.strategy.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for s in RankStrategy::ALL {
                        ui.selectable_value(&mut form.strategy, s, s.label());
                    }
                });
            ui.add(
                egui::Slider::new(
                    &mut form.display_percent,
                    MIN_DISPLAY_PERCENT..=MAX_DISPLAY_PERCENT,
                )
                .text("show top")
                .suffix("%"),
            );
            ui.add_space(8.0);

            if ui.button("🔍 Search").clicked() {
                state.run_search();
            }
        });
}

fn choice_text<T>(choice: &Choice<T>, any: &str, show: impl Fn(&T) -> String) -> String {
    match choice {
        Choice::Any => any.to_string(),
        Choice::Only(v) => show(v),
    }
}

fn non_negative(value: &mut f64, speed: f64) -> DragValue<'_> {
    DragValue::new(value).range(0.0..=f64::MAX).speed(speed)
}

/// A label + widget row. Returns whether the widget changed.
fn labelled(ui: &mut Ui, label: &str, widget: impl egui::Widget) -> bool {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.add(widget).changed()
    })
    .inner
}

/// Value editor with an auto/manual badge. Returns true when "reset" is clicked.
fn auto_field(ui: &mut Ui, field: &mut AutoField, unit: &str) -> bool {
    ui.horizontal(|ui: &mut Ui| {
        let mut value = field.value;
        if ui.add(non_negative(&mut value, 1.0).suffix(format!(" {unit}"))).changed() {
            field.set_manual(value);
        }
        if field.is_auto {
            ui.label(RichText::new("auto").weak());
            false
        } else {
            ui.small_button("↺ auto").clicked()
        }
    })
    .inner
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open catalog…").clicked() {
                if let Some(path) = pick_table_file("Open pump catalog") {
                    state.open_catalog(path);
                }
                ui.close_menu();
            }
            if ui.button("Open curves…").clicked() {
                if let Some(path) = pick_table_file("Open performance curves") {
                    state.open_curves(path);
                }
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(catalog) = &state.catalog {
            ui.label(format!(
                "{} pumps loaded, {} shown",
                catalog.len(),
                state.match_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

fn pick_table_file(title: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}
