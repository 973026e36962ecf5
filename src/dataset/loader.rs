// Post file loading: CSV, JSON array, or JSON Lines.
//
// The loader only checks structure: the required columns must exist and the
// counters must be numbers when present. Whether a record has both counters
// is decided later by the engagement calculator, which rejects it per record.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::models::{Dataset, RawPost, RejectedRecord};
use crate::engagement::calculator::compute_engagement;
use crate::error::{EngineError, Result};

pub const TEXT_COLUMN: &str = "text";
pub const FAVORITE_COLUMN: &str = "favorite_count";
pub const VIEW_COLUMN: &str = "view_count";

const REQUIRED_COLUMNS: [&str; 3] = [TEXT_COLUMN, FAVORITE_COLUMN, VIEW_COLUMN];

/// Records read from a file, plus the ones rejected while reading.
#[derive(Debug, Clone, Default)]
pub struct LoadedPosts {
    pub rows: Vec<RawPost>,
    pub rejected: Vec<RejectedRecord>,
}

impl LoadedPosts {
    /// Compute engagement for the loaded rows and merge the load-time
    /// rejections into the resulting dataset, ordered by input row.
    pub fn into_dataset(self) -> Dataset {
        let mut dataset = compute_engagement(self.rows);
        dataset.rejected.extend(self.rejected);
        dataset.rejected.sort_by_key(|r| r.row);
        dataset
    }
}

/// Load posts from a file, picking the format from its extension.
pub fn load_posts(path: &Path) -> Result<LoadedPosts> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let loaded = match extension.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?)?,
        "json" => read_json(&std::fs::read_to_string(path)?)?,
        "jsonl" | "ndjson" => read_json_lines(&std::fs::read_to_string(path)?)?,
        _ => {
            return Err(EngineError::UnsupportedFormat {
                path: path.display().to_string(),
            })
        }
    };

    info!(
        path = %path.display(),
        rows = loaded.rows.len(),
        rejected = loaded.rejected.len(),
        "Loaded posts"
    );

    Ok(loaded)
}

/// Read CSV with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<LoadedPosts> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let position = |column: &str| headers.iter().position(|h| h.trim() == column);
    let mut indices = [0usize; 3];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = position(column).ok_or_else(|| EngineError::MissingColumn {
            column: column.to_string(),
        })?;
    }
    let [text_idx, fav_idx, view_idx] = indices;

    let mut loaded = LoadedPosts::default();

    for (row, record) in csv_reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                reject(&mut loaded, EngineError::malformed(row, "record", e.to_string()));
                continue;
            }
        };

        let Some(text) = record.get(text_idx) else {
            reject(&mut loaded, EngineError::malformed(row, TEXT_COLUMN, "missing"));
            continue;
        };

        let counters = parse_csv_counter(row, FAVORITE_COLUMN, record.get(fav_idx))
            .and_then(|fav| {
                parse_csv_counter(row, VIEW_COLUMN, record.get(view_idx)).map(|view| (fav, view))
            });
        let (favorite_count, view_count) = match counters {
            Ok(pair) => pair,
            Err(e) => {
                reject(&mut loaded, e);
                continue;
            }
        };

        let extra: BTreeMap<String, Value> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| ![text_idx, fav_idx, view_idx].contains(i))
            .filter_map(|(i, name)| {
                record
                    .get(i)
                    .map(|v| (name.trim().to_string(), Value::String(v.to_string())))
            })
            .collect();

        loaded.rows.push(RawPost {
            row,
            text: text.to_string(),
            favorite_count,
            view_count,
            extra,
        });
    }

    Ok(loaded)
}

/// Read a JSON array of objects.
pub fn read_json(input: &str) -> Result<LoadedPosts> {
    let records: Vec<Map<String, Value>> = serde_json::from_str(input)?;
    from_objects(records.into_iter().map(Ok))
}

/// Read JSON Lines: one object per non-blank line.
pub fn read_json_lines(input: &str) -> Result<LoadedPosts> {
    let records = input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<Map<String, Value>>(line).map_err(|e| e.to_string()));
    from_objects(records)
}

fn from_objects<I>(records: I) -> Result<LoadedPosts>
where
    I: Iterator<Item = std::result::Result<Map<String, Value>, String>>,
{
    let records: Vec<_> = records.collect();

    // A column that no record carries is a structural problem, not a
    // per-record one.
    let parsed: Vec<&Map<String, Value>> = records.iter().filter_map(|r| r.as_ref().ok()).collect();
    if !parsed.is_empty() {
        for column in REQUIRED_COLUMNS {
            if !parsed.iter().any(|obj| obj.contains_key(column)) {
                return Err(EngineError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }
    }

    let mut loaded = LoadedPosts::default();

    for (row, record) in records.into_iter().enumerate() {
        let mut object = match record {
            Ok(object) => object,
            Err(reason) => {
                reject(&mut loaded, EngineError::malformed(row, "record", reason));
                continue;
            }
        };

        let text = match object.remove(TEXT_COLUMN) {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => {
                reject(&mut loaded, EngineError::malformed(row, TEXT_COLUMN, "missing"));
                continue;
            }
            Some(other) => {
                reject(
                    &mut loaded,
                    EngineError::malformed(row, TEXT_COLUMN, format!("expected a string, got {other}")),
                );
                continue;
            }
        };

        let counters = parse_json_counter(row, FAVORITE_COLUMN, object.remove(FAVORITE_COLUMN))
            .and_then(|fav| {
                parse_json_counter(row, VIEW_COLUMN, object.remove(VIEW_COLUMN))
                    .map(|view| (fav, view))
            });
        let (favorite_count, view_count) = match counters {
            Ok(pair) => pair,
            Err(e) => {
                reject(&mut loaded, e);
                continue;
            }
        };

        loaded.rows.push(RawPost {
            row,
            text,
            favorite_count,
            view_count,
            extra: object.into_iter().collect(),
        });
    }

    Ok(loaded)
}

fn parse_csv_counter(row: usize, field: &str, raw: Option<&str>) -> Result<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_number(row, field, s).map(Some),
    }
}

fn parse_json_counter(row: usize, field: &str, raw: Option<Value>) -> Result<Option<f64>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| EngineError::malformed(row, field, "number out of range")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_number(row, field, s.trim()).map(Some),
        Some(other) => Err(EngineError::malformed(
            row,
            field,
            format!("expected a number, got {other}"),
        )),
    }
}

fn parse_number(row: usize, field: &str, s: &str) -> Result<f64> {
    s.parse::<f64>()
        .map_err(|_| EngineError::malformed(row, field, format!("not a number: {s:?}")))
}

fn reject(loaded: &mut LoadedPosts, error: EngineError) {
    let row = match &error {
        EngineError::MalformedInput { row, .. } => *row,
        _ => loaded.rows.len() + loaded.rejected.len(),
    };
    warn!(row, error = %error, "Rejected input record");
    loaded.rejected.push(RejectedRecord {
        row,
        error: (&error).into(),
    });
}
