//! Shared builders for the data-layer unit tests.

use std::collections::BTreeSet;

use super::model::{Catalog, CellValue, PumpField, PumpRecord, Table};

pub fn s(v: &str) -> CellValue {
    CellValue::String(v.to_string())
}

pub fn table(headers: &[&str], rows: &[&[CellValue]]) -> Table {
    let mut t = Table::new(headers.iter().map(|h| h.to_string()).collect());
    for cells in rows {
        let row = headers
            .iter()
            .zip(cells.iter())
            .map(|(h, c)| (h.to_string(), c.clone()))
            .collect();
        t.rows.push(row);
    }
    t
}

pub fn pump(model: &str, category: &str, hz: f64, phase: u8, flow: f64, head: f64) -> PumpRecord {
    PumpRecord {
        model: model.to_string(),
        category: category.to_string(),
        frequency_hz: hz,
        phase,
        rated_flow_lpm: flow,
        rated_head_m: head,
        max_flow_lpm: None,
        max_head_m: None,
        particle_size_mm: None,
        power_kw: None,
        product_link: None,
    }
}

/// A catalog with every column present.
pub fn catalog(pumps: Vec<PumpRecord>) -> Catalog {
    let present: BTreeSet<PumpField> = PumpField::ALL.into_iter().collect();
    Catalog::from_pumps(pumps, present)
}

/// A mixed catalog used by filter and ranking tests.
pub fn mixed_catalog() -> Catalog {
    let mut sewage = pump("SW-200", "Sewage", 50.0, 3, 400.0, 12.0);
    sewage.particle_size_mm = Some(35.0);
    sewage.power_kw = Some(2.2);
    let mut sewage_small = pump("SW-050", "Sewage", 50.0, 1, 150.0, 8.0);
    sewage_small.particle_size_mm = Some(10.0);
    sewage_small.power_kw = Some(0.4);
    let mut booster = pump("BT-120", "Booster", 50.0, 1, 120.0, 20.0);
    booster.power_kw = Some(0.75);
    let mut booster_60 = pump("BT-120-60", "Booster", 60.0, 1, 130.0, 24.0);
    booster_60.power_kw = Some(0.75);
    let mut deep = pump("DW-30", "Deep Well", 50.0, 3, 60.0, 90.0);
    deep.power_kw = Some(1.5);
    catalog(vec![sewage, sewage_small, booster, booster_60, deep])
}
