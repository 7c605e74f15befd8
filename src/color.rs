use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Marker colour for the operating point.
pub const OPERATING_POINT: Color32 = Color32::from_rgb(220, 40, 40);

/// `n` distinct line colours with evenly spaced hues, starting at blue so a
/// single curve reads as the brand colour.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.7, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Stable model → line colour assignment for the comparison plot.
#[derive(Debug, Clone, Default)]
pub struct CurvePalette {
    mapping: BTreeMap<String, Color32>,
}

impl CurvePalette {
    pub fn new<S: AsRef<str>>(models: &[S]) -> Self {
        let mapping = models
            .iter()
            .map(|m| m.as_ref().to_string())
            .zip(generate_palette(models.len()))
            .collect();
        Self { mapping }
    }

    pub fn color_for(&self, model: &str) -> Color32 {
        self.mapping.get(model).copied().unwrap_or(Color32::GRAY)
    }
}
