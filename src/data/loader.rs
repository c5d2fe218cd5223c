use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type,
    Int8Type, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType, UInt32Type, UInt64Type,
};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Genre, Movie, Value};
use crate::error::LoadError;

/// One decoded row: column name → cell.
pub type Record = BTreeMap<String, Value>;

/// A decoded file before column types are applied.
#[derive(Debug, Default)]
struct RawTable {
    /// Column names in file order.
    columns: Vec<String>,
    rows: Vec<Record>,
}

/// Column names that may carry the genre identifier. Index columns written
/// without a header come back as `""` or, via pandas, `"Unnamed: 0"`.
const GENRE_ID_COLUMNS: [&str; 3] = ["id", "", "Unnamed: 0"];
const GENRE_NAME_COLUMNS: [&str; 2] = ["genres", "genre"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the movies table.
///
/// Returns `Err` only for [`LoadError::FileNotFound`] and
/// [`LoadError::EmptyData`]. Any other failure, including a release date
/// that does not parse, is logged and yields `Ok(None)`.
pub fn load_movies(path: &Path) -> Result<Option<Vec<Movie>>, LoadError> {
    soften(path, read_movies(path))
}

/// Load the genres table, with the same error contract as [`load_movies`].
pub fn load_genres(path: &Path) -> Result<Option<Vec<Genre>>, LoadError> {
    soften(path, read_genres(path))
}

/// Strict variant of [`load_movies`]: every failure is returned.
pub fn read_movies(path: &Path) -> Result<Vec<Movie>, LoadError> {
    let table = read_table(path)?;
    let movies = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, record)| movie_from_record(row, record))
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Loaded {} movies from {}", movies.len(), path.display());
    Ok(movies)
}

/// Strict variant of [`load_genres`].
pub fn read_genres(path: &Path) -> Result<Vec<Genre>, LoadError> {
    let table = read_table(path)?;
    let id_column = GENRE_ID_COLUMNS
        .into_iter()
        .find(|c| table.columns.iter().any(|h| h.as_str() == *c));
    let genres = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, record)| genre_from_record(row, record, id_column))
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Loaded {} genres from {}", genres.len(), path.display());
    Ok(genres)
}

fn soften<T>(path: &Path, result: Result<T, LoadError>) -> Result<Option<T>, LoadError> {
    match result {
        Ok(table) => Ok(Some(table)),
        Err(e) if e.is_hard() => Err(e),
        Err(e) => {
            log::error!("An error occurred while loading {}: {e}", path.display());
            Ok(None)
        }
    }
}

/// Decode a file into untyped rows. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – Parquet file, one column per field
/// * `.json`            – `[{ "id": 1, "title": "...", ... }, ...]`
/// * `.tsv` / `.tab`    – tab-delimited text with a header row
/// * anything else      – comma-delimited text with a header row
fn read_table(path: &Path) -> Result<RawTable, LoadError> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(LoadError::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };
    if meta.len() == 0 {
        return Err(LoadError::EmptyData(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => read_parquet(path),
        "json" => read_json(path),
        "tsv" | "tab" => read_delimited(path, b'\t'),
        _ => read_delimited(path, b','),
    }
    .map_err(|e| LoadError::Unreadable {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })?;

    if table.columns.is_empty() || table.rows.is_empty() {
        return Err(LoadError::EmptyData(path.to_path_buf()));
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Typed conversion
// ---------------------------------------------------------------------------

fn cell<'a>(record: &'a Record, row: usize, column: &'static str) -> Result<&'a Value, LoadError> {
    record
        .get(column)
        .ok_or(LoadError::MissingColumn { row, column })
}

fn movie_from_record(row: usize, record: &Record) -> Result<Movie, LoadError> {
    let missing = |column| LoadError::MissingColumn { row, column };

    let id = cell(record, row, "id")?.as_id().ok_or(missing("id"))?;
    let title = cell(record, row, "title")?.as_text().unwrap_or_default();
    // Blank vote cells load as missing; text that is not a number fails.
    let vote_count = match cell(record, row, "vote_count")? {
        Value::Null => None,
        value => Some(
            value
                .as_id()
                .and_then(|v| u64::try_from(v).ok())
                .ok_or(missing("vote_count"))?,
        ),
    };
    let vote_average = match cell(record, row, "vote_average")? {
        Value::Null => f64::NAN,
        value => value.as_f64().ok_or(missing("vote_average"))?,
    };

    let release_date = match record.get("release_date") {
        None | Some(Value::Null) => None,
        Some(Value::Date(d)) => Some(*d),
        Some(other) => {
            let text = other.to_string();
            if text.trim().is_empty() {
                None
            } else {
                let date = parse_date(&text).ok_or_else(|| LoadError::InvalidDate {
                    row,
                    value: text.clone(),
                })?;
                Some(date)
            }
        }
    };

    let optional_f64 = |column: &str| record.get(column).and_then(Value::as_f64);

    Ok(Movie {
        id,
        title,
        release_date,
        vote_count,
        vote_average,
        revenue: optional_f64("revenue"),
        budget: optional_f64("budget"),
        runtime: optional_f64("runtime"),
        genre_id: record.get("genre_id").and_then(Value::as_id),
    })
}

fn genre_from_record(
    row: usize,
    record: &Record,
    id_column: Option<&'static str>,
) -> Result<Genre, LoadError> {
    let id = match id_column {
        Some(column) => cell(record, row, column)?
            .as_id()
            .ok_or(LoadError::MissingColumn { row, column })?,
        // No identifier column: the row position is the identifier.
        None => row as i64,
    };
    let name = GENRE_NAME_COLUMNS
        .into_iter()
        .find_map(|c| record.get(c))
        .ok_or(LoadError::MissingColumn {
            row,
            column: "genres",
        })?
        .as_text()
        .unwrap_or_default();
    Ok(Genre { id, name })
}

/// Parse a release date. Accepted shapes:
/// `2015-06-09`, `2015/06/09`, `6/9/2015`, `6/9/15` and an ISO date-time
/// whose date part is one of the above.
///
/// Two-digit years follow chrono's `%y` pivot: 00–69 → 20xx, 70–99 → 19xx.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);

    if date_part.contains('/') {
        if date_part.find('/') == Some(4) {
            return NaiveDate::parse_from_str(date_part, "%Y/%m/%d").ok();
        }
        let year_len = date_part.rsplit('/').next().map_or(0, str::len);
        let fmt = if year_len == 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
        return NaiveDate::parse_from_str(date_part, fmt).ok();
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Delimited text reader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per line. Cells stay text and
/// are typed on conversion; empty cells become [`Value::Null`].
fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .context("opening delimited file")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        let row = columns
            .iter()
            .zip(record.iter())
            .map(|(col, text)| {
                let value = if text.trim().is_empty() {
                    Value::Null
                } else {
                    Value::String(text.to_string())
                };
                (col.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable { columns, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "id": 19995, "title": "Avatar", "release_date": "2009-12-10", "genre_id": 3 },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("expected top-level JSON array")?;

    let mut table = RawTable::default();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;

        let mut row = Record::new();
        for (key, val) in obj {
            if !table.columns.contains(key) {
                table.columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_value(val));
        }
        table.rows.push(row);
    }

    Ok(table)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Every column becomes a field of the row; works with
/// files written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let mut record = Record::new();
            for (col_idx, col_name) in columns.iter().enumerate() {
                let value = extract_value(batch.column(col_idx), row)
                    .with_context(|| format!("row {row}, column '{col_name}'"))?;
                record.insert(col_name.clone(), value);
            }
            rows.push(record);
        }
    }

    Ok(RawTable { columns, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => Value::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => Value::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt32 => Value::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            Value::Integer(i64::try_from(v).context("unsigned value out of range")?)
        }
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        DataType::Date32 => date_value(col.as_primitive::<Date32Type>().value_as_date(row))?,
        DataType::Date64 => date_value(col.as_primitive::<Date64Type>().value_as_date(row))?,
        DataType::Timestamp(unit, _) => date_value(match unit {
            TimeUnit::Second => col
                .as_primitive::<TimestampSecondType>()
                .value_as_date(row),
            TimeUnit::Millisecond => col
                .as_primitive::<TimestampMillisecondType>()
                .value_as_date(row),
            TimeUnit::Microsecond => col
                .as_primitive::<TimestampMicrosecondType>()
                .value_as_date(row),
            TimeUnit::Nanosecond => col
                .as_primitive::<TimestampNanosecondType>()
                .value_as_date(row),
        })?,
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

fn date_value(date: Option<NaiveDate>) -> Result<Value> {
    date.map(Value::Date).context("date out of range")
}
