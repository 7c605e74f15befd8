use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::color::OPERATING_POINT;
use crate::data::curve::CurveData;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Performance-curve comparison plot
// ---------------------------------------------------------------------------

/// Render one line per compared model plus the operating-point marker.
pub fn curve_plot(ui: &mut Ui, state: &AppState) {
    if state.curves.is_none() {
        ui.label("No curve data loaded.");
        return;
    }
    if state.overlay.curves.is_empty() {
        ui.label("Tick pumps in the table to compare their curves.");
        return;
    }

    for curve in &state.overlay.curves {
        if curve.data == CurveData::NoData {
            ui.label(RichText::new(format!("No curve data for {}", curve.model)).weak());
        }
    }

    Plot::new("curve_plot")
        .legend(Legend::default())
        .x_axis_label("Flow (LPM)")
        .y_axis_label("Head (m)")
        .include_x(0.0)
        .include_y(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for curve in &state.overlay.curves {
                let CurveData::Points(points) = &curve.data else {
                    continue;
                };
                let color = state.palette.color_for(&curve.model);
                let line_points: PlotPoints = points.iter().map(|p| [p.flow_lpm, p.head_m]).collect();
                let markers: PlotPoints = points.iter().map(|p| [p.flow_lpm, p.head_m]).collect();

                plot_ui.line(Line::new(line_points).name(&curve.model).color(color).width(2.0));
                plot_ui.points(
                    Points::new(markers)
                        .name(&curve.model)
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .radius(3.0),
                );
            }

            if let Some(op) = state.overlay.operating_point {
                plot_ui.points(
                    Points::new(vec![[op.flow_lpm, op.head_m]])
                        .name("Operating point")
                        .color(OPERATING_POINT)
                        .shape(MarkerShape::Diamond)
                        .filled(true)
                        .radius(7.0),
                );
            }
        });
}
