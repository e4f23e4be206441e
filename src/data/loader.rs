use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Provenance, StarRecord, UnitKind};

/// Column names, in the positional order used by delimited tables.
pub const COLUMNS: [&str; 7] = ["id", "unit", "ba", "eu", "la", "fe_h", "source"];

/// Default absence marker of the reference dataset.
pub const DEFAULT_SENTINEL: &str = "x";

// ---------------------------------------------------------------------------
// Errors and options
// ---------------------------------------------------------------------------

/// Fatal ingestion failures. `row` is the 1-based file line for text and CSV
/// tables, and the 1-based record index for JSON and Parquet.
#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("row {row}: '{value}' in column '{column}' is neither a number nor the absence marker")]
    MalformedInput {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: expected at least {expected} columns, found {found}")]
    TooFewColumns {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Marker meaning "no measurement" in numeric columns.
    pub sentinel: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a star table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.txt` / `.dat` / `.tsv` – whitespace-separated, first line is a header
/// * `.csv`     – comma-separated with a header row
/// * `.json`    – `[{ "id": ..., "unit": "logE", "ba": 9.1, ... }, ...]`
/// * `.parquet` – columns named as in [`COLUMNS`], nulls mean absent
pub fn load_file(path: &Path, opts: &IngestOptions) -> Result<Vec<StarRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let stars = match ext.as_str() {
        "txt" | "dat" | "tsv" => load_text(path, opts),
        "csv" => load_csv(path, opts),
        "json" => load_json(path, opts),
        "parquet" | "pq" => load_parquet(path, opts),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!("Loaded {} stars from {}", stars.len(), path.display());
    Ok(stars)
}

// ---------------------------------------------------------------------------
// Cell parsing shared by all formats
// ---------------------------------------------------------------------------

fn parse_slot(
    raw: &str,
    row: usize,
    column: &'static str,
    opts: &IngestOptions,
) -> Result<Option<f64>, IngestError> {
    let tok = raw.trim();
    if tok == opts.sentinel {
        return Ok(None);
    }
    match tok.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(IngestError::MalformedInput {
            row,
            column,
            value: tok.to_string(),
        }),
    }
}

fn check_finite(v: f64, row: usize, column: &'static str) -> Result<f64, IngestError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(IngestError::MalformedInput {
            row,
            column,
            value: v.to_string(),
        })
    }
}

/// Build a record from positional fields (id, unit, ba, eu, la, fe_h, source).
fn record_from_fields(
    fields: &[&str],
    row: usize,
    opts: &IngestOptions,
) -> Result<StarRecord, IngestError> {
    if fields.len() < COLUMNS.len() {
        return Err(IngestError::TooFewColumns {
            row,
            expected: COLUMNS.len(),
            found: fields.len(),
        });
    }
    Ok(StarRecord {
        id: fields[0].trim().to_string(),
        unit_kind: UnitKind::from_tag(fields[1]),
        barium: parse_slot(fields[2], row, COLUMNS[2], opts)?,
        europium: parse_slot(fields[3], row, COLUMNS[3], opts)?,
        lanthanum: parse_slot(fields[4], row, COLUMNS[4], opts)?,
        metallicity: parse_slot(fields[5], row, COLUMNS[5], opts)?,
        provenance: Provenance::from_tag(fields[6]),
    })
}

// ---------------------------------------------------------------------------
// Whitespace-delimited text loader
// ---------------------------------------------------------------------------

fn load_text(path: &Path, opts: &IngestOptions) -> Result<Vec<StarRecord>> {
    let text = std::fs::read_to_string(path).context("reading text table")?;
    Ok(parse_text_table(&text, opts)?)
}

/// Parse a whitespace-delimited table. The first line is a header and is
/// always skipped; blank lines and `#` comments are ignored. Errors carry the
/// file line number.
pub fn parse_text_table(text: &str, opts: &IngestOptions) -> Result<Vec<StarRecord>, IngestError> {
    let mut stars = Vec::new();
    let data_lines = text
        .lines()
        .enumerate()
        .skip(1)
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    for (line_no, line) in data_lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        stars.push(record_from_fields(&fields, line_no, opts)?);
    }
    Ok(stars)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, then the same positional columns as the text
/// table. Header names are not interpreted; row length is checked per record
/// so trailing extras are ignored and short rows report `TooFewColumns`.
fn load_csv(path: &Path, opts: &IngestOptions) -> Result<Vec<StarRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let mut stars = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV record {}", i + 1))?;
        let row = record
            .position()
            .map_or(i + 2, |pos| pos.line() as usize);
        let fields: Vec<&str> = record.iter().collect();
        stars.push(record_from_fields(&fields, row, opts)?);
    }
    Ok(stars)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "id": "HD 122563", "unit": "X/Fe", "ba": -1.0, "eu": -0.5,
///     "la": null, "fe_h": -2.7, "source": "E" },
///   ...
/// ]
/// ```
///
/// Numeric keys may be a number, `null`, missing, or a string holding a
/// number or the absence marker.
fn load_json(path: &Path, opts: &IngestOptions) -> Result<Vec<StarRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut stars = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let row = i + 1;
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;

        let text_of = |key: &str| obj.get(key).map(json_to_text).unwrap_or_default();
        let number_of = |column: &'static str| json_to_slot(obj.get(column), row, column, opts);

        stars.push(StarRecord {
            id: text_of("id"),
            unit_kind: UnitKind::from_tag(&text_of("unit")),
            barium: number_of("ba")?,
            europium: number_of("eu")?,
            lanthanum: number_of("la")?,
            metallicity: number_of("fe_h")?,
            provenance: Provenance::from_tag(&text_of("source")),
        });
    }
    Ok(stars)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_to_slot(
    val: Option<&JsonValue>,
    row: usize,
    column: &'static str,
    opts: &IngestOptions,
) -> Result<Option<f64>, IngestError> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => match n.as_f64() {
            Some(v) => check_finite(v, row, column).map(Some),
            None => Err(IngestError::MalformedInput {
                row,
                column,
                value: n.to_string(),
            }),
        },
        Some(JsonValue::String(s)) => parse_slot(s, row, column, opts),
        Some(other) => Err(IngestError::MalformedInput {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing a star table.
///
/// Expected schema:
/// - `id`, `unit`, `source`: Utf8 or LargeUtf8
/// - `ba`, `eu`, `la`, `fe_h`: Float64 / Float32 / Int64 / Int32, nulls mean
///   absent; Utf8 columns are also accepted and parsed like text cells
///
/// Works with files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path, opts: &IngestOptions) -> Result<Vec<StarRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut stars = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let first_row = stars.len() + 1;

        let ids = text_column(&batch, "id")?;
        let units = text_column(&batch, "unit")?;
        let sources = text_column(&batch, "source")?;
        let ba = numeric_column(&batch, "ba", first_row, opts)?;
        let eu = numeric_column(&batch, "eu", first_row, opts)?;
        let la = numeric_column(&batch, "la", first_row, opts)?;
        let fe_h = numeric_column(&batch, "fe_h", first_row, opts)?;

        for row in 0..batch.num_rows() {
            stars.push(StarRecord {
                id: ids[row].clone().unwrap_or_default(),
                unit_kind: UnitKind::from_tag(units[row].as_deref().unwrap_or("")),
                barium: ba[row],
                europium: eu[row],
                lanthanum: la[row],
                metallicity: fe_h[row],
                provenance: Provenance::from_tag(sources[row].as_deref().unwrap_or("")),
            });
        }
    }

    Ok(stars)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))
}

/// Extract a string column; nulls stay `None`.
fn text_column(batch: &RecordBatch, name: &str) -> Result<Vec<Option<String>>> {
    let col = column(batch, name)?;
    let values = match col.data_type() {
        DataType::Utf8 => col
            .as_string::<i32>()
            .iter()
            .map(|v| v.map(str::to_string))
            .collect(),
        DataType::LargeUtf8 => col
            .as_string::<i64>()
            .iter()
            .map(|v| v.map(str::to_string))
            .collect(),
        other => bail!("Column '{name}' is {other:?}, expected Utf8"),
    };
    Ok(values)
}

/// Extract a numeric slot column as `Option<f64>` per row.
fn numeric_column(
    batch: &RecordBatch,
    name: &'static str,
    first_row: usize,
    opts: &IngestOptions,
) -> Result<Vec<Option<f64>>> {
    let col = column(batch, name)?;

    let raw: Vec<Option<f64>> = if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        arr.iter().collect()
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        arr.iter().map(|v| v.map(f64::from)).collect()
    } else if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        arr.iter().map(|v| v.map(|i| i as f64)).collect()
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        arr.iter().map(|v| v.map(f64::from)).collect()
    } else if matches!(col.data_type(), DataType::Utf8 | DataType::LargeUtf8) {
        let cells = text_column(batch, name)?;
        return cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Some(s) => Ok(parse_slot(s, first_row + i, name, opts)?),
                None => Ok(None),
            })
            .collect();
    } else {
        bail!(
            "Column '{name}' is {:?}, expected a numeric or Utf8 column",
            col.data_type()
        )
    };

    raw.into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            Some(v) => Ok(Some(check_finite(v, first_row + i, name)?)),
            None => Ok(None),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
Star Units Ba Eu La FeH Source
HD1 X/Fe 0.1 0.2 x -1.0 E
HD2 logE 9.0 11.5 10.2 -0.5 I

# comment line
HD3 logE 9.1 x x x I
";

    #[test]
    fn text_table_maps_sentinel_to_none() {
        let stars = parse_text_table(TABLE, &IngestOptions::default()).unwrap();
        assert_eq!(stars.len(), 3);

        assert_eq!(stars[0].id, "HD1");
        assert_eq!(stars[0].unit_kind, UnitKind::AlreadyRatio);
        assert_eq!(stars[0].lanthanum, None);
        assert_eq!(stars[0].provenance, Provenance::Literature);

        assert_eq!(stars[1].unit_kind, UnitKind::LogAbundance);
        assert_eq!(stars[1].lanthanum, Some(10.2));
        assert_eq!(stars[1].provenance, Provenance::Internal);

        assert_eq!(stars[2].metallicity, None);
    }

    #[test]
    fn non_numeric_cell_is_malformed() {
        let text = "header\nHD1 X/Fe 0.1 abc x -1.0 E\n";
        let err = parse_text_table(text, &IngestOptions::default()).unwrap_err();
        assert_eq!(
            err,
            IngestError::MalformedInput {
                row: 2,
                column: "eu",
                value: "abc".into()
            }
        );
    }

    #[test]
    fn errors_report_file_line_past_comments() {
        let text = "header\nHD1 X/Fe 0.1 0.2 x -1.0 E\n\n# note\nHD2 X/Fe 0.1 ? x -1.0 E\n";
        let err = parse_text_table(text, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::MalformedInput { row: 5, column: "eu", .. }));
    }

    #[test]
    fn extra_trailing_fields_are_ignored() {
        let text = "header\nHD1 X/Fe 0.1 0.2 x -1.0 E note\n";
        let stars = parse_text_table(text, &IngestOptions::default()).unwrap();
        assert_eq!(stars[0].provenance, Provenance::Literature);
    }

    #[test]
    fn nan_is_malformed_not_absent() {
        let text = "header\nHD1 X/Fe NaN x x -1.0 E\n";
        let err = parse_text_table(text, &IngestOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::MalformedInput { column: "ba", .. }));
    }

    #[test]
    fn short_row_is_rejected() {
        let text = "header\nHD1 X/Fe 0.1 0.2\n";
        let err = parse_text_table(text, &IngestOptions::default()).unwrap_err();
        assert_eq!(
            err,
            IngestError::TooFewColumns {
                row: 2,
                expected: 7,
                found: 4
            }
        );
    }

    #[test]
    fn custom_sentinel() {
        let opts = IngestOptions {
            sentinel: "--".into(),
        };
        let text = "header\nHD1 X/Fe -- 0.2 -- -1.0 I\n";
        let stars = parse_text_table(text, &opts).unwrap();
        assert_eq!(stars[0].barium, None);
        assert_eq!(stars[0].europium, Some(0.2));

        // The default marker is now an ordinary malformed token.
        let text = "header\nHD1 X/Fe x 0.2 -- -1.0 I\n";
        assert!(parse_text_table(text, &opts).is_err());
    }

    #[test]
    fn json_slots_accept_null_numbers_and_marker() {
        let opts = IngestOptions::default();
        assert_eq!(json_to_slot(None, 1, "ba", &opts), Ok(None));
        assert_eq!(json_to_slot(Some(&JsonValue::Null), 1, "ba", &opts), Ok(None));
        assert_eq!(
            json_to_slot(Some(&serde_json::json!(-1.5)), 1, "ba", &opts),
            Ok(Some(-1.5))
        );
        assert_eq!(
            json_to_slot(Some(&serde_json::json!("x")), 1, "ba", &opts),
            Ok(None)
        );
        assert!(json_to_slot(Some(&serde_json::json!(true)), 1, "ba", &opts).is_err());
    }
}
