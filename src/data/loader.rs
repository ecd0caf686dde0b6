use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, LargeListArray, ListArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{Curve, LoadedCurves};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a set of correlation curves from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – `x` and `y` list columns, optional `key`/`label`/`selected`
/// * `.json`    – `[{ "x": [...], "y": [...], "key": "#1:", "label": "...", "selected": true }, ...]`
/// * `.csv`     – columns `x` and `y` containing semicolon-separated floats
pub fn load_file(path: &Path) -> Result<LoadedCurves> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    collect_records(records)
}

// ---------------------------------------------------------------------------
// Record → LoadedCurves
// ---------------------------------------------------------------------------

/// One row of a curve file, independent of the on-disk format.
#[derive(Debug, Clone, Default, Deserialize)]
struct CurveRecord {
    x: Vec<f64>,
    y: Vec<f64>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    selected: Option<bool>,
}

/// Assemble rows into keyed collections.
///
/// Rows without a key are numbered `#1:`, `#2:`, … by position. Labels and
/// the preselection are only produced when at least one row carries them.
fn collect_records(records: Vec<CurveRecord>) -> Result<LoadedCurves> {
    let has_labels = records.iter().any(|r| r.label.is_some());
    let has_selection = records.iter().any(|r| r.selected.is_some());

    let mut loaded = LoadedCurves {
        labels: has_labels.then(Default::default),
        preselect: has_selection.then(Vec::new),
        ..Default::default()
    };

    for (row, rec) in records.into_iter().enumerate() {
        let key = rec.key.unwrap_or_else(|| format!("#{}:", row + 1));
        let curve = Curve::new(rec.x, rec.y)
            .with_context(|| format!("Row {row}: x and y have different lengths"))?;

        if loaded.curves.insert(key.clone(), curve).is_some() {
            bail!("Row {row}: duplicate curve key {key:?}");
        }
        if let Some(labels) = loaded.labels.as_mut() {
            labels.insert(key.clone(), rec.label.unwrap_or_default());
        }
        if let Some(preselect) = loaded.preselect.as_mut() {
            if rec.selected.unwrap_or(false) {
                preselect.push(key);
            }
        }
    }

    Ok(loaded)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "x": [1e-6, 2e-6, ...],
///     "y": [1.21, 1.20, ...],
///     "key": "#1:",
///     "label": "AC1 sample A",
///     "selected": true
///   },
///   ...
/// ]
/// ```
///
/// `key`, `label` and `selected` are optional.
fn load_json(path: &Path) -> Result<Vec<CurveRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Vec<CurveRecord>> {
    serde_json::from_str(text).context("parsing JSON curve records")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names.
/// `x` and `y` columns contain semicolon-separated floats:
///   `"1e-6;2e-6;4e-6"`, `"1.21;1.20;1.18"`
/// Optional `key`, `label` and `selected` (`true`/`false`) columns.
fn load_csv(path: &Path) -> Result<Vec<CurveRecord>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<CurveRecord>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &str| headers.iter().position(|h| h == name);
    let x_idx = column("x").context("CSV missing 'x' column")?;
    let y_idx = column("y").context("CSV missing 'y' column")?;
    let key_idx = column("key");
    let label_idx = column("label");
    let selected_idx = column("selected");

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::trim);

        let x = parse_semicolon_floats(record.get(x_idx).unwrap_or(""), row_no, "x")?;
        let y = parse_semicolon_floats(record.get(y_idx).unwrap_or(""), row_no, "y")?;

        let selected = match cell(selected_idx) {
            None | Some("") => None,
            Some(s) => Some(parse_bool(s).with_context(|| {
                format!("CSV row {row_no}: '{s}' is not a valid 'selected' value")
            })?),
        };

        records.push(CurveRecord {
            x,
            y,
            key: cell(key_idx).filter(|s| !s.is_empty()).map(str::to_string),
            label: cell(label_idx).map(str::to_string),
            selected,
        });
    }

    Ok(records)
}

fn parse_semicolon_floats(s: &str, row: usize, col: &str) -> Result<Vec<f64>> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(';')
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<f64>()
                .with_context(|| format!("Row {row}, {col}[{j}]: '{tok}' is not a number"))
        })
        .collect()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing correlation curves.
///
/// Expected schema:
/// - `x`: List<Float64> or LargeList<Float64> – lag times
/// - `y`: List<Float64> or LargeList<Float64> – correlation values
/// - `key`, `label` (Utf8) and `selected` (Boolean) are optional
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<CurveRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        // Locate x and y columns
        let x_idx = schema
            .index_of("x")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'x' column"))?;
        let y_idx = schema
            .index_of("y")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'y' column"))?;

        let x_col = batch.column(x_idx);
        let y_col = batch.column(y_idx);
        let key_col = schema.index_of("key").ok().map(|i| batch.column(i));
        let label_col = schema.index_of("label").ok().map(|i| batch.column(i));
        let selected_col = schema.index_of("selected").ok().map(|i| batch.column(i));

        for row in 0..n_rows {
            let x = extract_f64_list(x_col, row)
                .with_context(|| format!("Row {row}: failed to read 'x'"))?;
            let y = extract_f64_list(y_col, row)
                .with_context(|| format!("Row {row}: failed to read 'y'"))?;

            let key = key_col
                .map(|c| extract_string(c, row))
                .transpose()
                .with_context(|| format!("Row {row}: failed to read 'key'"))?
                .flatten();
            let label = label_col
                .map(|c| extract_string(c, row))
                .transpose()
                .with_context(|| format!("Row {row}: failed to read 'label'"))?
                .flatten();
            let selected = selected_col
                .map(|c| extract_bool(c, row))
                .transpose()
                .with_context(|| format!("Row {row}: failed to read 'selected'"))?
                .flatten();

            records.push(CurveRecord {
                x,
                y,
                key,
                label,
                selected,
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &Arc<dyn Array>, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values_array = match col.data_type() {
        DataType::List(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<ListArray>()
                .context("expected ListArray")?;
            list_arr.value(row)
        }
        DataType::LargeList(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<LargeListArray>()
                .context("expected LargeListArray")?;
            list_arr.value(row)
        }
        other => bail!("Expected List or LargeList column, got {other:?}"),
    };

    // The inner array can be Float64 or Float32
    if let Some(f64_arr) = values_array.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = values_array.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.iter().map(|v| v.unwrap_or(f32::NAN) as f64).collect())
    } else {
        bail!(
            "List inner type is {:?}, expected Float64 or Float32",
            values_array.data_type()
        )
    }
}

/// Read a Utf8 / LargeUtf8 cell; nulls become `None`.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(Some(arr.value(row).to_string()))
        }
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row).to_string())),
        other => bail!("Expected Utf8 column, got {other:?}"),
    }
}

/// Read a Boolean cell; nulls become `None`.
fn extract_bool(col: &Arc<dyn Array>, row: usize) -> Result<Option<bool>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let arr = col
        .as_any()
        .downcast_ref::<BooleanArray>()
        .with_context(|| format!("Expected Boolean column, got {:?}", col.data_type()))?;
    Ok(Some(arr.value(row)))
}
