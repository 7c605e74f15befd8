use std::collections::BTreeMap;

use super::filter::Requirement;
use super::model::{CellValue, PumpField, Table};

// ---------------------------------------------------------------------------
// Curve types
// ---------------------------------------------------------------------------

/// One sample of a performance curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub flow_lpm: f64,
    pub head_m: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CurveData {
    /// Points sorted ascending by head.
    Points(Vec<CurvePoint>),
    /// Unknown model, or a model with no usable samples.
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelCurve {
    pub model: String,
    pub data: CurveData,
}

/// Everything the plot needs: one series per model plus the marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveOverlay {
    pub curves: Vec<ModelCurve>,
    pub operating_point: Option<CurvePoint>,
}

// ---------------------------------------------------------------------------
// Head-encoded columns
// ---------------------------------------------------------------------------

/// Parse a column header such as `"10M"`, `"7.5 m"` or `"10"` into a head in
/// metres. Returns `None` for anything that does not name a head.
pub fn parse_head_column(name: &str) -> Option<f64> {
    let trimmed = name.trim();
    let number = trimmed
        .strip_suffix(['m', 'M'])
        .unwrap_or(trimmed)
        .trim_end();
    let head: f64 = number.parse().ok()?;
    (head.is_finite() && head >= 0.0).then_some(head)
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Extract the curve of one model. Empty when the model is absent or has no
/// positive numeric samples.
pub fn build_curve(curve_table: &Table, model_id: &str) -> Vec<CurvePoint> {
    let Some(model_col) = curve_table.find_column(PumpField::Model.aliases()) else {
        log::warn!("Curve table has no model column");
        return Vec::new();
    };
    let model_id = model_id.trim();
    let Some(row) = curve_table
        .rows
        .iter()
        .find(|row| row.get(model_col).and_then(CellValue::as_text).as_deref() == Some(model_id))
    else {
        return Vec::new();
    };
    curve_from_row(curve_table, model_col, row)
}

fn curve_from_row(curve_table: &Table, model_col: &str, row: &BTreeMap<String, CellValue>) -> Vec<CurvePoint> {
    let mut points: Vec<CurvePoint> = curve_table
        .column_names
        .iter()
        .filter(|name| name.as_str() != model_col)
        .filter_map(|name| {
            let head_m = parse_head_column(name)?;
            let flow_lpm = row.get(name)?.coerce_f64();
            (flow_lpm > 0.0).then_some(CurvePoint { flow_lpm, head_m })
        })
        .collect();

    // Stable sort keeps the first column for a repeated head.
    points.sort_by(|a, b| a.head_m.total_cmp(&b.head_m));
    points.dedup_by(|later, earlier| later.head_m == earlier.head_m);
    points
}

/// Build one curve per requested model, in request order. Repeated ids are
/// collapsed; models without points are reported as [`CurveData::NoData`].
pub fn build_comparison<S: AsRef<str>>(curve_table: &Table, model_ids: &[S]) -> Vec<ModelCurve> {
    let mut curves: Vec<ModelCurve> = Vec::with_capacity(model_ids.len());
    for id in model_ids {
        let model = id.as_ref().trim();
        if curves.iter().any(|c| c.model == model) {
            continue;
        }
        let points = build_curve(curve_table, model);
        let data = if points.is_empty() {
            log::debug!("No curve data for {model}");
            CurveData::NoData
        } else {
            CurveData::Points(points)
        };
        curves.push(ModelCurve {
            model: model.to_string(),
            data,
        });
    }
    curves
}

/// The requirement as a plot marker, when it names any flow or head.
pub fn operating_point(requirement: &Requirement) -> Option<CurvePoint> {
    let req = requirement.clone().sanitized();
    (req.flow_lpm > 0.0 || req.head_m > 0.0).then_some(CurvePoint {
        flow_lpm: req.flow_lpm,
        head_m: req.head_m,
    })
}

/// Curves for the selected models plus the operating-point marker.
pub fn build_overlay<S: AsRef<str>>(
    curve_table: &Table,
    model_ids: &[S],
    requirement: Option<&Requirement>,
) -> CurveOverlay {
    CurveOverlay {
        curves: build_comparison(curve_table, model_ids),
        operating_point: requirement.and_then(operating_point),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{s, table};

    fn curve_table() -> Table {
        table(
            &["Model", "5M", "10M", "15M", "20M", "Notes"],
            &[
                &[s("A"), CellValue::Integer(100), s(""), CellValue::Integer(0), CellValue::Integer(50), s("x")],
                &[s("B"), CellValue::Float(90.0), CellValue::Float(70.0), CellValue::Float(40.0), s("n/a"), CellValue::Null],
                &[s("C"), CellValue::Null, s(""), s("-"), CellValue::Integer(-3), s("")],
            ],
        )
    }

    #[test]
    fn head_column_names() {
        assert_eq!(parse_head_column("10M"), Some(10.0));
        assert_eq!(parse_head_column(" 7.5 m "), Some(7.5));
        assert_eq!(parse_head_column("0M"), Some(0.0));
        assert_eq!(parse_head_column("25"), Some(25.0));
        assert_eq!(parse_head_column("Model"), None);
        assert_eq!(parse_head_column("m"), None);
        assert_eq!(parse_head_column("-5M"), None);
    }

    #[test]
    fn skips_blank_zero_and_text_cells() {
        let points = build_curve(&curve_table(), "A");
        assert_eq!(
            points,
            vec![
                CurvePoint { flow_lpm: 100.0, head_m: 5.0 },
                CurvePoint { flow_lpm: 50.0, head_m: 20.0 },
            ]
        );
    }

    #[test]
    fn sorts_by_head_regardless_of_column_order() {
        let t = table(
            &["Model", "20M", "5M", "10M"],
            &[&[s("A"), CellValue::Integer(10), CellValue::Integer(80), CellValue::Integer(60)]],
        );
        let heads: Vec<f64> = build_curve(&t, "A").iter().map(|p| p.head_m).collect();
        assert_eq!(heads, vec![5.0, 10.0, 20.0]);
    }

    #[test]
    fn repeated_heads_keep_the_first_column() {
        let t = table(
            &["Model", "10M", "10 m"],
            &[&[s("A"), CellValue::Integer(60), CellValue::Integer(65)]],
        );
        assert_eq!(build_curve(&t, "A"), vec![CurvePoint { flow_lpm: 60.0, head_m: 10.0 }]);
    }

    #[test]
    fn comparison_reports_no_data() {
        let curves = build_comparison(&curve_table(), &["B", "C", "Missing", "B"]);
        assert_eq!(curves.len(), 3);
        assert_eq!(curves[0].model, "B");
        assert!(matches!(&curves[0].data, CurveData::Points(p) if p.len() == 3));
        assert_eq!(curves[1].data, CurveData::NoData);
        assert_eq!(curves[2].model, "Missing");
        assert_eq!(curves[2].data, CurveData::NoData);
    }

    #[test]
    fn table_without_model_column_yields_nothing() {
        let t = table(&["5M"], &[&[CellValue::Integer(10)]]);
        assert!(build_curve(&t, "A").is_empty());
    }

    #[test]
    fn operating_point_marker() {
        let req = Requirement {
            flow_lpm: 100.0,
            head_m: 18.0,
            ..Default::default()
        };
        let overlay = build_overlay(&curve_table(), &["A"], Some(&req));
        assert_eq!(
            overlay.operating_point,
            Some(CurvePoint { flow_lpm: 100.0, head_m: 18.0 })
        );
        assert_eq!(operating_point(&Requirement::default()), None);
        assert_eq!(build_overlay(&curve_table(), &["A"], None).operating_point, None);
    }
}
