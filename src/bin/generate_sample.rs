use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const CATALOG_CSV: &str = "Pump Selection Data.csv";
const CATALOG_PARQUET: &str = "Pump Selection Data.parquet";
const CURVES_CSV: &str = "Pump Curve Data.csv";

/// Head columns written to the curve sheet, in metres.
const CURVE_HEADS: [u32; 16] = [0, 5, 10, 15, 20, 25, 30, 40, 50, 60, 70, 80, 90, 100, 120, 150];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

struct Family {
    prefix: &'static str,
    category: &'static str,
    flow: (f64, f64),
    head: (f64, f64),
    solids: Option<(f64, f64)>,
}

const FAMILIES: [Family; 4] = [
    Family { prefix: "BT", category: "Booster", flow: (40.0, 250.0), head: (15.0, 60.0), solids: None },
    Family { prefix: "SW", category: "Sewage", flow: (150.0, 1200.0), head: (5.0, 20.0), solids: Some((10.0, 50.0)) },
    Family { prefix: "DW", category: "Deep Well", flow: (30.0, 200.0), head: (40.0, 140.0), solids: None },
    Family { prefix: "SB", category: "Submersible", flow: (80.0, 600.0), head: (8.0, 35.0), solids: Some((5.0, 20.0)) },
];

struct Pump {
    model: String,
    category: &'static str,
    hz: i64,
    phase: i64,
    flow: f64,
    head: f64,
    solids: Option<f64>,
    power_kw: f64,
    link: String,
}

impl Pump {
    /// Flow at `head` on a parabolic curve through the rated point.
    fn flow_at(&self, head: f64) -> Option<f64> {
        let shutoff_head = self.head * 1.3;
        let max_flow = self.flow * 1.6;
        (head < shutoff_head).then(|| max_flow * (1.0 - head / shutoff_head).sqrt())
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<Pump> {
    let mut pumps = Vec::new();
    for family in &FAMILIES {
        for size in 1..=6 {
            for (hz, phase) in [(50, 1), (50, 3), (60, 3)] {
                let flow = rng.range(family.flow.0, family.flow.1).round();
                let head = (rng.range(family.head.0, family.head.1) * 2.0).round() / 2.0;
                // Hydraulic power at 50% efficiency, rounded to a motor size.
                let power_kw = ((flow / 60_000.0 * head * 9.81 / 0.5) * 4.0).ceil() / 4.0;
                let model = format!("{}-{}{:02}-{hz}", family.prefix, size, phase * 10);
                pumps.push(Pump {
                    link: format!("https://pumps.example.com/products/{}", model.to_lowercase()),
                    model,
                    category: family.category,
                    hz,
                    phase,
                    flow,
                    head,
                    solids: family.solids.map(|(lo, hi)| rng.range(lo, hi).round()),
                    power_kw,
                });
            }
        }
    }
    pumps
}

fn write_catalog_csv(pumps: &[Pump]) -> Result<()> {
    let mut w = csv::Writer::from_path(CATALOG_CSV).context("creating catalog CSV")?;
    w.write_record([
        "Model", "Category", "Frequency (Hz)", "Phase", "Rated Flow (LPM)", "Rated Head (M)",
        "Pass Solid Dia (mm)", "Power (kW)", "Product Link",
    ])?;
    for p in pumps {
        w.write_record([
            p.model.clone(),
            p.category.to_string(),
            p.hz.to_string(),
            p.phase.to_string(),
            p.flow.to_string(),
            p.head.to_string(),
            p.solids.map(|s| s.to_string()).unwrap_or_default(),
            p.power_kw.to_string(),
            p.link.clone(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn write_curves_csv(pumps: &[Pump]) -> Result<()> {
    let mut w = csv::Writer::from_path(CURVES_CSV).context("creating curve CSV")?;
    let mut header = vec!["Model".to_string()];
    header.extend(CURVE_HEADS.iter().map(|h| format!("{h}M")));
    w.write_record(&header)?;
    for p in pumps {
        let mut row = vec![p.model.clone()];
        row.extend(CURVE_HEADS.iter().map(|&h| {
            p.flow_at(h as f64)
                .map(|q| format!("{q:.0}"))
                .unwrap_or_default()
        }));
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

fn write_catalog_parquet(pumps: &[Pump]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Model", DataType::Utf8, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Frequency (Hz)", DataType::Int64, false),
        Field::new("Phase", DataType::Int64, false),
        Field::new("Rated Flow (LPM)", DataType::Float64, false),
        Field::new("Rated Head (M)", DataType::Float64, false),
        Field::new("Pass Solid Dia (mm)", DataType::Float64, true),
        Field::new("Power (kW)", DataType::Float64, false),
        Field::new("Product Link", DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(pumps.iter().map(|p| p.model.as_str()))),
        Arc::new(StringArray::from_iter_values(pumps.iter().map(|p| p.category))),
        Arc::new(Int64Array::from_iter_values(pumps.iter().map(|p| p.hz))),
        Arc::new(Int64Array::from_iter_values(pumps.iter().map(|p| p.phase))),
        Arc::new(Float64Array::from_iter_values(pumps.iter().map(|p| p.flow))),
        Arc::new(Float64Array::from_iter_values(pumps.iter().map(|p| p.head))),
        Arc::new(Float64Array::from(pumps.iter().map(|p| p.solids).collect::<Vec<_>>())),
        Arc::new(Float64Array::from_iter_values(pumps.iter().map(|p| p.power_kw))),
        Arc::new(StringArray::from_iter_values(pumps.iter().map(|p| p.link.as_str()))),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(CATALOG_PARQUET).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let pumps = generate(&mut rng);

    write_catalog_csv(&pumps)?;
    write_curves_csv(&pumps)?;
    write_catalog_parquet(&pumps)?;

    println!(
        "Wrote {} pumps to {CATALOG_CSV}, {CATALOG_PARQUET} and {CURVES_CSV}",
        pumps.len()
    );
    Ok(())
}
