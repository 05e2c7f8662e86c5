// File: crates/chart-core/src/loader.rs
// Summary: Dataset loader for uploaded CSV and JSON files with per-cell type inference.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use serde_json::Value as Json;
use thiserror::Error;

use crate::dataset::{Column, Dataset, DatasetError, Value};

/// Input that cannot be turned into a dataset. Always a client-side problem.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected table shape: {0}")]
    Shape(String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Pick the format from a file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self, LoadError> {
        let ext = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            _ => Err(LoadError::UnsupportedFormat(name.to_string())),
        }
    }
}

/// Load a dataset from disk, dispatching on the file extension.
pub fn load_path(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let format = DataFormat::from_file_name(&path.to_string_lossy())?;
    let file = std::fs::File::open(path)?;
    load_reader(file, format)
}

pub fn load_reader<R: Read>(reader: R, format: DataFormat) -> Result<Dataset, LoadError> {
    let ds = match format {
        DataFormat::Csv => read_csv(reader)?,
        DataFormat::Json => read_json(reader)?,
    };
    debug!("loaded dataset: {} columns, {} rows", ds.columns().len(), ds.row_count());
    Ok(ds)
}

/// Read a delimited file with a header row. Ragged records are rejected by the csv reader.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.iter().map(str::to_string).collect::<Vec<_>>();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::Shape("missing header row".into()));
    }
    let headers = dedupe_headers(headers);

    let mut cells: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for rec in rdr.records() {
        let rec = rec?;
        for (i, raw) in rec.iter().enumerate() {
            cells[i].push(parse_cell(raw));
        }
    }

    let columns = headers.into_iter().zip(cells).map(|(h, v)| Column::new(h, v)).collect();
    Ok(Dataset::new(columns)?)
}

/// Repeated header names get a `.1`, `.2`, ... suffix, as pandas does.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(headers.len());
    for h in headers {
        let mut name = h.clone();
        let mut n = 1;
        while out.contains(&name) {
            name = format!("{h}.{n}");
            n += 1;
        }
        if name != h {
            debug!("duplicate CSV header '{h}' renamed to '{name}'");
        }
        out.push(name);
    }
    out
}

/// Read JSON in one of the common table orientations:
/// - records: `[{"a": 1, "b": 2}, ...]`
/// - columns of arrays: `{"a": [1, ...], "b": [2, ...]}`
/// - columns of index maps: `{"a": {"0": 1, ...}, ...}`
///
/// Index maps are aligned on their keys (union in first-seen order); a key a column
/// lacks is a null cell.
pub fn read_json<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let doc: Json = serde_json::from_reader(reader)?;
    match doc {
        Json::Array(rows) => from_records(rows),
        Json::Object(map) => {
            let mut index: Vec<&String> = Vec::new();
            for key in map.values().filter_map(Json::as_object).flat_map(|m| m.keys()) {
                if !index.contains(&key) {
                    index.push(key);
                }
            }

            let mut columns = Vec::with_capacity(map.len());
            for (name, col) in &map {
                let values = match col {
                    Json::Array(items) => items.iter().map(json_cell).collect(),
                    Json::Object(indexed) => index
                        .iter()
                        .map(|key| indexed.get(key.as_str()).map(json_cell).unwrap_or(Value::Null))
                        .collect(),
                    other => {
                        return Err(LoadError::Shape(format!(
                            "column '{name}' must be an array or object, got {other}"
                        )))
                    }
                };
                columns.push(Column::new(name.clone(), values));
            }
            Ok(Dataset::new(columns)?)
        }
        other => Err(LoadError::Shape(format!("expected an array or object at top level, got {other}"))),
    }
}

fn from_records(rows: Vec<Json>) -> Result<Dataset, LoadError> {
    let mut names: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::Shape(format!("record {i} is not an object")))?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let values = rows
                .iter()
                .map(|row| row.get(&name).map(json_cell).unwrap_or(Value::Null))
                .collect();
            Column::new(name, values)
        })
        .collect();
    Ok(Dataset::new(columns)?)
}

fn json_cell(v: &Json) -> Value {
    match v {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Number(if *b { 1.0 } else { 0.0 }),
        Json::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        Json::String(s) => parse_temporal(s).map(Value::Time).unwrap_or_else(|| Value::Text(s.clone())),
        other => Value::Text(other.to_string()),
    }
}

/// Cells read as missing, matching pandas' default `na_values`.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Infer a cell type: NA token -> null, number, ISO date/datetime, else text.
pub fn parse_cell(raw: &str) -> Value {
    let s = raw.trim();
    if NA_TOKENS.contains(&s) {
        return Value::Null;
    }
    if let Ok(v) = s.parse::<f64>() {
        return Value::Number(v);
    }
    if let Some(t) = parse_temporal(s) {
        return Value::Time(t);
    }
    Value::Text(raw.to_string())
}

fn parse_temporal(s: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_cell_types() {
        assert_eq!(parse_cell(""), Value::Null);
        assert_eq!(parse_cell(" 1.5 "), Value::Number(1.5));
        assert_eq!(parse_cell("abc"), Value::Text("abc".into()));
        let t = NaiveDate::from_ymd_opt(2023, 9, 13).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_cell("2023-09-13"), Value::Time(t));
        assert_eq!(parse_cell("2023-09-13T00:00:00Z"), Value::Time(t));
    }

    #[test]
    fn csv_keeps_header_order() {
        let ds = read_csv("time,rmsdA,label\n0,1.5,a\n1,2.5,b\n".as_bytes()).unwrap();
        assert_eq!(ds.column_names().collect::<Vec<_>>(), ["time", "rmsdA", "label"]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column("label").unwrap().values()[1], Value::Text("b".into()));
    }

    #[test]
    fn csv_ragged_rows_are_rejected() {
        let err = read_csv("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)), "{err}");
    }

    #[test]
    fn json_orientations() {
        let records = read_json(r#"[{"x": 1, "y": "a"}, {"x": 2}]"#.as_bytes()).unwrap();
        assert_eq!(records.column("y").unwrap().values(), &[Value::from("a"), Value::Null]);

        let columns = read_json(r#"{"x": [1, 2], "y": [3, 4]}"#.as_bytes()).unwrap();
        assert_eq!(columns.column_names().collect::<Vec<_>>(), ["x", "y"]);

        let indexed = read_json(r#"{"x": {"0": 1, "1": 2}, "y": {"0": 3, "1": 4}}"#.as_bytes()).unwrap();
        assert_eq!(indexed.column("y").unwrap().values(), &[Value::from(3.0), Value::from(4.0)]);
    }

    #[test]
    fn index_maps_align_on_keys() {
        let ds = read_json(r#"{"x": {"0": 10, "1": 20}, "y": {"1": 2, "0": 1}}"#.as_bytes()).unwrap();
        assert_eq!(ds.column("x").unwrap().values(), &[Value::from(10.0), Value::from(20.0)]);
        assert_eq!(ds.column("y").unwrap().values(), &[Value::from(1.0), Value::from(2.0)]);

        let sparse = read_json(r#"{"x": {"0": 10, "1": 20}, "y": {"1": 2}}"#.as_bytes()).unwrap();
        assert_eq!(sparse.row_count(), 2);
        assert_eq!(sparse.column("y").unwrap().values(), &[Value::Null, Value::from(2.0)]);

        // keys only some columns carry still become rows
        let union = read_json(r#"{"x": {"0": 1}, "y": {"0": 2, "5": 3}}"#.as_bytes()).unwrap();
        assert_eq!(union.column("x").unwrap().values(), &[Value::from(1.0), Value::Null]);
    }

    #[test]
    fn csv_missing_value_tokens_are_null() {
        let ds = read_csv("x,y\n0,1\nNA,2\n2,N/A\nnull,<NA>\n".as_bytes()).unwrap();
        assert_eq!(
            ds.column("x").unwrap().values(),
            &[Value::from(0.0), Value::Null, Value::from(2.0), Value::Null]
        );
        assert_eq!(
            ds.column("y").unwrap().values(),
            &[Value::from(1.0), Value::from(2.0), Value::Null, Value::Null]
        );
        for token in ["None", "NULL", "#N/A", "n/a", "NaN", "nan"] {
            assert_eq!(parse_cell(token), Value::Null, "{token}");
        }
        assert_eq!(parse_cell("Nat"), Value::Text("Nat".into()));
    }

    #[test]
    fn csv_duplicate_headers_are_suffixed() {
        let ds = read_csv("a,b,a,a\n1,2,3,4\n".as_bytes()).unwrap();
        assert_eq!(ds.column_names().collect::<Vec<_>>(), ["a", "b", "a.1", "a.2"]);
        assert_eq!(ds.column("a.1").unwrap().values(), &[Value::from(3.0)]);
    }

    #[test]
    fn json_scalar_is_a_shape_error() {
        assert!(matches!(read_json("42".as_bytes()), Err(LoadError::Shape(_))));
        assert!(matches!(read_json("{".as_bytes()), Err(LoadError::Json(_))));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DataFormat::from_file_name("a.CSV").unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::from_file_name("a.json").unwrap(), DataFormat::Json);
        assert!(matches!(DataFormat::from_file_name("a.xlsx"), Err(LoadError::UnsupportedFormat(_))));
    }
}
