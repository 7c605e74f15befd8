use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from CSV / JSON / Parquet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Coerce-or-zero: numeric cells and numeric text yield their value,
    /// anything else (blank, text, NaN, negative) yields `0.0`.
    pub fn coerce_f64(&self) -> f64 {
        let raw = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            CellValue::Bool(_) | CellValue::Null => 0.0,
        };
        if raw.is_finite() && raw > 0.0 {
            raw
        } else {
            0.0
        }
    }

    /// Trimmed text form; `None` for nulls and blank strings.
    pub fn as_text(&self) -> Option<String> {
        let text = self.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Table – one loaded sheet (catalog or curve table)
// ---------------------------------------------------------------------------

/// Column-named rows, kept in source order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Header names in file order.
    pub column_names: Vec<String>,
    pub rows: Vec<BTreeMap<String, CellValue>>,
}

impl Table {
    pub fn new(column_names: Vec<String>) -> Self {
        Self {
            column_names,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve the first alias that names a column (case-insensitive, trimmed).
    pub fn find_column(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| {
            self.column_names
                .iter()
                .find(|name| name.trim().eq_ignore_ascii_case(alias))
                .map(String::as_str)
        })
    }
}

// ---------------------------------------------------------------------------
// PumpField – catalog columns and their accepted headers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PumpField {
    Model,
    Category,
    Frequency,
    Phase,
    RatedFlow,
    RatedHead,
    MaxFlow,
    MaxHead,
    ParticleSize,
    Power,
    ProductLink,
}

impl PumpField {
    pub const ALL: [PumpField; 11] = [
        PumpField::Model,
        PumpField::Category,
        PumpField::Frequency,
        PumpField::Phase,
        PumpField::RatedFlow,
        PumpField::RatedHead,
        PumpField::MaxFlow,
        PumpField::MaxHead,
        PumpField::ParticleSize,
        PumpField::Power,
        PumpField::ProductLink,
    ];

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            PumpField::Model => &["Model", "Model No.", "Model Name", "Model ID"],
            PumpField::Category => &["Category"],
            PumpField::Frequency => &["Frequency (Hz)", "Frequency"],
            PumpField::Phase => &["Phase"],
            PumpField::RatedFlow => &["Rated Flow (LPM)", "Rated Flow"],
            PumpField::RatedHead => &["Rated Head (M)", "Rated Head"],
            PumpField::MaxFlow => &["Max Flow (LPM)", "Max Flow"],
            PumpField::MaxHead => &["Max Head (M)", "Max Head"],
            PumpField::ParticleSize => {
                &["Pass Solid Dia (mm)", "Particle Size (mm)", "Solids (mm)"]
            }
            PumpField::Power => &["Power (kW)", "Power"],
            PumpField::ProductLink => &["Product Link", "Link", "URL"],
        }
    }
}

// ---------------------------------------------------------------------------
// PumpRecord / Catalog
// ---------------------------------------------------------------------------

/// One catalog row after coercion. Numeric fields are never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpRecord {
    pub model: String,
    pub category: String,
    pub frequency_hz: f64,
    pub phase: u8,
    pub rated_flow_lpm: f64,
    pub rated_head_m: f64,
    pub max_flow_lpm: Option<f64>,
    pub max_head_m: Option<f64>,
    pub particle_size_mm: Option<f64>,
    pub power_kw: Option<f64>,
    pub product_link: Option<String>,
}

/// The typed catalog snapshot every search runs against.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Pumps in source row order.
    pub pumps: Vec<PumpRecord>,
    /// Fields whose column was present in the source table.
    pub present: BTreeSet<PumpField>,
    /// Sorted unique categories (for the category selector).
    pub categories: Vec<String>,
    /// Sorted unique frequencies.
    pub frequencies: Vec<f64>,
    /// Sorted unique phases.
    pub phases: Vec<u8>,
}

impl Catalog {
    /// Type a loaded table into a catalog. Only the model column is required.
    pub fn from_table(table: &Table) -> Result<Self, CatalogError> {
        let mut columns: BTreeMap<PumpField, String> = BTreeMap::new();
        for field in PumpField::ALL {
            if let Some(name) = table.find_column(field.aliases()) {
                columns.insert(field, name.to_string());
            }
        }

        let model_col = columns
            .get(&PumpField::Model)
            .cloned()
            .ok_or(CatalogError::MissingColumn("Model"))?;

        // Rated columns drive selection; a catalog that only carries the
        // legacy max columns uses those instead.
        let flow_col = rated_or_legacy(&columns, PumpField::RatedFlow, PumpField::MaxFlow);
        let head_col = rated_or_legacy(&columns, PumpField::RatedHead, PumpField::MaxHead);

        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut pumps = Vec::with_capacity(table.len());

        for (row_no, row) in table.rows.iter().enumerate() {
            let Some(model) = row.get(&model_col).and_then(CellValue::as_text) else {
                log::warn!("Catalog row {row_no}: missing model id, skipped");
                continue;
            };
            if !seen.insert(model.clone()) {
                log::warn!("Catalog row {row_no}: duplicate model '{model}', skipped");
                continue;
            }

            let number = |col: Option<&String>| -> f64 {
                col.and_then(|c| row.get(c)).map_or(0.0, CellValue::coerce_f64)
            };
            let optional = |field: PumpField| -> Option<f64> {
                columns
                    .get(&field)
                    .map(|c| row.get(c).map_or(0.0, CellValue::coerce_f64))
            };
            let text = |field: PumpField| -> Option<String> {
                columns
                    .get(&field)
                    .and_then(|c| row.get(c))
                    .and_then(CellValue::as_text)
            };

            pumps.push(PumpRecord {
                model,
                category: text(PumpField::Category).unwrap_or_default(),
                frequency_hz: number(columns.get(&PumpField::Frequency)),
                phase: coerce_phase(number(columns.get(&PumpField::Phase))),
                rated_flow_lpm: number(flow_col.as_ref()),
                rated_head_m: number(head_col.as_ref()),
                max_flow_lpm: optional(PumpField::MaxFlow),
                max_head_m: optional(PumpField::MaxHead),
                particle_size_mm: optional(PumpField::ParticleSize),
                power_kw: optional(PumpField::Power),
                product_link: text(PumpField::ProductLink),
            });
        }

        let mut present: BTreeSet<PumpField> = columns.keys().copied().collect();
        if flow_col.is_some() {
            present.insert(PumpField::RatedFlow);
        }
        if head_col.is_some() {
            present.insert(PumpField::RatedHead);
        }

        Ok(Self::from_pumps(pumps, present))
    }

    /// Build the selector indices from already-typed records.
    pub fn from_pumps(pumps: Vec<PumpRecord>, present: BTreeSet<PumpField>) -> Self {
        let categories: BTreeSet<String> = pumps
            .iter()
            .filter(|p| !p.category.is_empty())
            .map(|p| p.category.clone())
            .collect();

        let mut frequencies: Vec<f64> = pumps
            .iter()
            .map(|p| p.frequency_hz)
            .filter(|f| *f > 0.0)
            .collect();
        frequencies.sort_by(f64::total_cmp);
        frequencies.dedup();

        let phases: BTreeSet<u8> = pumps.iter().map(|p| p.phase).filter(|p| *p > 0).collect();

        Catalog {
            pumps,
            present,
            categories: categories.into_iter().collect(),
            frequencies,
            phases: phases.into_iter().collect(),
        }
    }

    pub fn has(&self, field: PumpField) -> bool {
        self.present.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.pumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pumps.is_empty()
    }
}

fn rated_or_legacy(
    columns: &BTreeMap<PumpField, String>,
    rated: PumpField,
    legacy: PumpField,
) -> Option<String> {
    if let Some(col) = columns.get(&rated) {
        return Some(col.clone());
    }
    let col = columns.get(&legacy)?;
    log::info!("No {rated:?} column; using legacy column '{col}'");
    Some(col.clone())
}

fn coerce_phase(value: f64) -> u8 {
    let rounded = value.round();
    if (1.0..=u8::MAX as f64).contains(&rounded) {
        rounded as u8
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{s, table};

    #[test]
    fn coerce_or_zero() {
        assert_eq!(CellValue::Float(12.5).coerce_f64(), 12.5);
        assert_eq!(CellValue::Integer(3).coerce_f64(), 3.0);
        assert_eq!(s(" 40 ").coerce_f64(), 40.0);
        assert_eq!(s("n/a").coerce_f64(), 0.0);
        assert_eq!(s("").coerce_f64(), 0.0);
        assert_eq!(CellValue::Null.coerce_f64(), 0.0);
        assert_eq!(CellValue::Float(-4.0).coerce_f64(), 0.0);
        assert_eq!(CellValue::Float(f64::NAN).coerce_f64(), 0.0);
        assert_eq!(CellValue::Bool(true).coerce_f64(), 0.0);
    }

    #[test]
    fn find_column_is_case_insensitive_and_ordered() {
        let t = table(&[" category ", "MODEL NO.", "Model"], &[]);
        assert_eq!(t.find_column(PumpField::Category.aliases()), Some(" category "));
        // First alias wins even though a later alias appears earlier in the file.
        assert_eq!(t.find_column(PumpField::Model.aliases()), Some("Model"));
        assert_eq!(t.find_column(PumpField::Power.aliases()), None);
    }

    #[test]
    fn catalog_coerces_bad_cells_to_zero() {
        let t = table(
            &["Model", "Category", "Frequency (Hz)", "Phase", "Rated Flow (LPM)", "Rated Head (M)"],
            &[
                &[s("A"), s("Booster"), CellValue::Integer(50), CellValue::Integer(1), s("abc"), CellValue::Float(20.0)],
                &[s("B"), s("Sewage"), CellValue::Integer(60), CellValue::Integer(3), CellValue::Integer(80), CellValue::Null],
            ],
        );
        let catalog = Catalog::from_table(&t).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.pumps[0].rated_flow_lpm, 0.0);
        assert_eq!(catalog.pumps[0].rated_head_m, 20.0);
        assert_eq!(catalog.pumps[1].rated_head_m, 0.0);
        assert_eq!(catalog.pumps[1].phase, 3);
        assert_eq!(catalog.categories, vec!["Booster".to_string(), "Sewage".to_string()]);
        assert_eq!(catalog.frequencies, vec![50.0, 60.0]);
        assert_eq!(catalog.phases, vec![1, 3]);
        assert!(!catalog.has(PumpField::Power));
        assert_eq!(catalog.pumps[0].power_kw, None);
    }

    #[test]
    fn missing_model_column_is_an_error() {
        let t = table(&["Category"], &[&[s("Booster")]]);
        assert!(matches!(
            Catalog::from_table(&t),
            Err(CatalogError::MissingColumn("Model"))
        ));
    }

    #[test]
    fn duplicate_and_blank_models_are_skipped() {
        let t = table(
            &["Model", "Rated Flow"],
            &[
                &[s("A"), CellValue::Integer(10)],
                &[s("A"), CellValue::Integer(99)],
                &[s("  "), CellValue::Integer(5)],
            ],
        );
        let catalog = Catalog::from_table(&t).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.pumps[0].rated_flow_lpm, 10.0);
    }

    #[test]
    fn legacy_max_columns_stand_in_for_missing_rated_columns() {
        let t = table(
            &["Model", "Max Flow (LPM)", "Max Head (M)", "Rated Head (M)"],
            &[&[s("A"), CellValue::Integer(200), CellValue::Integer(40), CellValue::Integer(25)]],
        );
        let catalog = Catalog::from_table(&t).unwrap();
        let pump = &catalog.pumps[0];
        assert_eq!(pump.rated_flow_lpm, 200.0);
        assert_eq!(pump.rated_head_m, 25.0);
        assert_eq!(pump.max_flow_lpm, Some(200.0));
        assert_eq!(pump.max_head_m, Some(40.0));
        assert!(catalog.has(PumpField::RatedFlow));
    }
}
