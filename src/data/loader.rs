use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table (catalog or curve sheet) from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "Model": "...", "Category": "...", ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_table(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows from {} with columns {:?}",
        table.len(),
        path.display(),
        table.column_names
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(headers.clone());

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: BTreeMap<String, CellValue> = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.clone(), csv_cell(value)))
            .collect();
        table.rows.push(row);
    }

    Ok(table)
}

/// CSV cells stay text so identifiers like `007` or `1.50` survive intact;
/// numeric columns are parsed later by [`CellValue::coerce_f64`].
fn csv_cell(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
/// Column order follows first appearance across the records (object key
/// order is kept by serde_json's `preserve_order` feature).
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut table = Table::default();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = BTreeMap::new();
        for (key, val) in obj {
            if !table.column_names.contains(key) {
                table.column_names.push(key.clone());
            }
            row.insert(key.clone(), json_to_cell(val));
        }
        table.rows.push(row);
    }

    Ok(table)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns (strings, ints, floats,
/// bools). Works with files written by Pandas and Polars.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut table = Table::new(column_names.clone());

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells: BTreeMap<String, CellValue> = column_names
                .iter()
                .enumerate()
                .map(|(col_idx, name)| (name.clone(), extract_cell(batch.column(col_idx), row)))
                .collect();
            table.rows.push(cells);
        }
    }

    Ok(table)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(CellValue::Null, |a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(CellValue::Null, |a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map_or(CellValue::Null, |a| CellValue::Bool(a.value(row))),
        other => {
            log::warn!("Unsupported parquet column type {other:?}, treated as null");
            CellValue::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{ArrayRef, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use crate::data::curve::build_curve;
    use crate::data::model::Catalog;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_cells_keep_text_and_coerce() {
        let file = write_temp(
            ".csv",
            "Model,Frequency (Hz),Rated Flow (LPM),Product Link\n\
             A-1, 50 ,12.5,https://example.com/a\n\
             B-2,60,,\n",
        );
        let table = load_table(file.path()).unwrap();
        assert_eq!(table.column_names, vec!["Model", "Frequency (Hz)", "Rated Flow (LPM)", "Product Link"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0]["Model"], CellValue::String("A-1".into()));
        assert_eq!(table.rows[0]["Frequency (Hz)"], CellValue::String("50".into()));
        assert_eq!(table.rows[0]["Frequency (Hz)"].coerce_f64(), 50.0);
        assert_eq!(table.rows[0]["Rated Flow (LPM)"].coerce_f64(), 12.5);
        assert_eq!(table.rows[1]["Rated Flow (LPM)"], CellValue::Null);
    }

    #[test]
    fn numeric_looking_model_ids_keep_their_text() {
        let file = write_temp(".csv", "Model,Rated Flow (LPM)\n007,10\n1.50,20\n1.5,30\n");
        let catalog = Catalog::from_table(&load_table(file.path()).unwrap()).unwrap();
        let ids: Vec<&str> = catalog.pumps.iter().map(|p| p.model.as_str()).collect();
        assert_eq!(ids, vec!["007", "1.50", "1.5"]);
        assert_eq!(catalog.pumps[1].rated_flow_lpm, 20.0);
    }

    #[test]
    fn short_csv_rows_leave_cells_absent() {
        let file = write_temp(".csv", "Model,5M,10M\nA,100\n");
        let table = load_table(file.path()).unwrap();
        assert!(!table.rows[0].contains_key("10M"));
    }

    #[test]
    fn json_records() {
        let file = write_temp(
            ".json",
            r#"[{"Model": "A", "Phase": 1, "Rated Head (M)": 20.5},
                {"Model": "B", "Power (kW)": null}]"#,
        );
        let table = load_table(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.column_names.contains(&"Power (kW)".to_string()));
        assert_eq!(table.rows[0]["Phase"], CellValue::Integer(1));
        assert_eq!(table.rows[0]["Rated Head (M)"], CellValue::Float(20.5));
        assert_eq!(table.rows[1]["Power (kW)"], CellValue::Null);
    }

    #[test]
    fn json_columns_keep_file_order() {
        let file = write_temp(
            ".json",
            r#"[{"Model": "A", "20M": 50, "5M": 100, "10M": 80, "10 m": 99}]"#,
        );
        let table = load_table(file.path()).unwrap();
        assert_eq!(table.column_names, vec!["Model", "20M", "5M", "10M", "10 m"]);
        let heads: Vec<(f64, f64)> = build_curve(&table, "A")
            .iter()
            .map(|p| (p.head_m, p.flow_lpm))
            .collect();
        assert_eq!(heads, vec![(5.0, 100.0), (10.0, 80.0), (20.0, 50.0)]);
    }

    #[test]
    fn parquet_cells_are_typed_and_nulls_kept() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Model", DataType::Utf8, false),
            Field::new("Phase", DataType::Int64, false),
            Field::new("Pass Solid Dia (mm)", DataType::Float64, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(["SW-1", "SW-2"])),
            Arc::new(Int64Array::from_iter_values([1, 3])),
            Arc::new(Float64Array::from(vec![Some(25.0), None])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(std::fs::File::create(file.path()).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.column_names, vec!["Model", "Phase", "Pass Solid Dia (mm)"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0]["Model"], CellValue::String("SW-1".into()));
        assert_eq!(table.rows[1]["Phase"], CellValue::Integer(3));
        assert_eq!(table.rows[0]["Pass Solid Dia (mm)"], CellValue::Float(25.0));
        assert_eq!(table.rows[1]["Pass Solid Dia (mm)"], CellValue::Null);

        let catalog = Catalog::from_table(&table).unwrap();
        assert_eq!(catalog.pumps[1].particle_size_mm, Some(0.0));
        assert_eq!(catalog.phases, vec![1, 3]);
    }

    #[test]
    fn json_must_be_an_array() {
        let file = write_temp(".json", r#"{"Model": "A"}"#);
        assert!(load_table(file.path()).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        let err = load_table(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }

    #[test]
    fn csv_cells_are_trimmed_text() {
        assert_eq!(csv_cell("  "), CellValue::Null);
        assert_eq!(csv_cell(" 007 "), CellValue::String("007".into()));
        assert_eq!(csv_cell("Booster"), CellValue::String("Booster".into()));
    }
}
