//! Converts heterogeneous input shapes (row-lists, column-lists, keyed JSON,
//! CSV/TSV text) into canonical targets.
//!
//! Structural problems (a row or column missing a declared key) are fatal:
//! downstream index alignment would silently corrupt every later computation,
//! so ingestion returns a `DataIntegrity` error naming the offending index.
//! Date-parse failures on individual x values are recoverable: they are
//! logged and degrade to an unplaced value rather than aborting the series.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::config::{DataConfig, XAxisKind};
use crate::data::target::{Target, Value};
use crate::error::{ChartError, ChartResult};

/// Format tried first when `data.x_format` is not configured.
pub const DEFAULT_X_FORMAT: &str = "%Y-%m-%d";

/// Ingestion result: targets in declaration order plus category labels
/// harvested from the x column (category axes only).
#[derive(Debug, Clone, Default)]
pub struct IngestOutput {
    pub targets: Vec<Target>,
    pub categories: Vec<String>,
}

/// Converts the configured data source into canonical targets.
pub fn ingest(data: &DataConfig, x_kind: XAxisKind) -> ChartResult<IngestOutput> {
    let columns = collect_columns(data)?;
    build_targets(data, x_kind, columns)
}

/// Key-ordered column table, the common shape every source lowers into.
type ColumnTable = IndexMap<String, Vec<JsonValue>>;

fn collect_columns(data: &DataConfig) -> ChartResult<ColumnTable> {
    if let Some(rows) = &data.rows {
        return rows_to_columns(rows, data.keys.as_ref().map(keyed_fields));
    }
    if let Some(columns) = &data.columns {
        return columns_to_table(columns);
    }
    if let Some(json) = &data.json {
        return json_to_columns(json, data.keys.as_ref().map(keyed_fields));
    }
    if let Some(text) = &data.csv {
        return delimited_to_columns(text, b',');
    }
    if let Some(text) = &data.tsv {
        return delimited_to_columns(text, b'\t');
    }
    Err(ChartError::NoDataSource)
}

fn keyed_fields(keys: &crate::config::DataKeys) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    if let Some(x) = &keys.x {
        fields.push(x.clone());
    }
    fields.extend(keys.value.iter().cloned());
    fields
}

fn rows_to_columns(
    rows: &[IndexMap<String, JsonValue>],
    declared: Option<Vec<String>>,
) -> ChartResult<ColumnTable> {
    let keys: Vec<String> = match declared {
        Some(keys) => keys,
        None => rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default(),
    };

    let mut table: ColumnTable = keys
        .iter()
        .map(|key| (key.clone(), Vec::with_capacity(rows.len())))
        .collect();

    for (row_index, row) in rows.iter().enumerate() {
        for key in &keys {
            let Some(cell) = row.get(key) else {
                return Err(ChartError::DataIntegrity {
                    context: format!("missing value for key '{key}'"),
                    unit: "row",
                    index: row_index,
                });
            };
            if let Some(column) = table.get_mut(key) {
                column.push(cell.clone());
            }
        }
    }

    Ok(table)
}

fn columns_to_table(columns: &[Vec<JsonValue>]) -> ChartResult<ColumnTable> {
    let mut table = ColumnTable::new();

    // Each column is one self-contained series; lengths may differ.
    for (column_index, column) in columns.iter().enumerate() {
        let Some(JsonValue::String(key)) = column.first() else {
            return Err(ChartError::DataIntegrity {
                context: "column must start with a string key".to_owned(),
                unit: "column",
                index: column_index,
            });
        };
        table.insert(key.clone(), column[1..].to_vec());
    }

    Ok(table)
}

fn json_to_columns(json: &JsonValue, declared: Option<Vec<String>>) -> ChartResult<ColumnTable> {
    match json {
        // Keyed-object list: `keys` selects which fields become targets.
        JsonValue::Array(items) => {
            let Some(keys) = declared else {
                return Err(ChartError::InvalidConfig(
                    "data.json array form requires data.keys".to_owned(),
                ));
            };
            let rows: Vec<IndexMap<String, JsonValue>> = items
                .iter()
                .enumerate()
                .map(|(row_index, item)| match item {
                    JsonValue::Object(map) => {
                        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    }
                    _ => Err(ChartError::DataIntegrity {
                        context: "keyed JSON entry must be an object".to_owned(),
                        unit: "row",
                        index: row_index,
                    }),
                })
                .collect::<ChartResult<_>>()?;
            rows_to_columns(&rows, Some(keys))
        }
        // Object-of-arrays: each field is already a column, lengths free.
        JsonValue::Object(map) => {
            let mut table = ColumnTable::new();
            for (column_index, (key, column)) in map.iter().enumerate() {
                let JsonValue::Array(values) = column else {
                    return Err(ChartError::DataIntegrity {
                        context: format!("field '{key}' must be an array"),
                        unit: "column",
                        index: column_index,
                    });
                };
                table.insert(key.clone(), values.clone());
            }
            Ok(table)
        }
        _ => Err(ChartError::InvalidConfig(
            "data.json must be an array of objects or an object of arrays".to_owned(),
        )),
    }
}

fn delimited_to_columns(text: &str, delimiter: u8) -> ChartResult<ColumnTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| ChartError::InvalidData(format!("unreadable header row: {error}")))?
        .iter()
        .map(str::to_owned)
        .collect();

    let mut table: ColumnTable = headers
        .iter()
        .map(|key| (key.clone(), Vec::new()))
        .collect();

    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|error| ChartError::DataIntegrity {
            context: format!("unreadable record: {error}"),
            unit: "row",
            index: row_index,
        })?;
        if record.len() != headers.len() {
            return Err(ChartError::DataIntegrity {
                context: format!(
                    "expected {} cells, found {}",
                    headers.len(),
                    record.len()
                ),
                unit: "row",
                index: row_index,
            });
        }
        for (key, cell) in headers.iter().zip(record.iter()) {
            let parsed = cell
                .parse::<f64>()
                .map(JsonValue::from)
                .unwrap_or_else(|_| JsonValue::String(cell.to_owned()));
            if let Some(column) = table.get_mut(key) {
                column.push(parsed);
            }
        }
    }

    Ok(table)
}

fn build_targets(
    data: &DataConfig,
    x_kind: XAxisKind,
    mut table: ColumnTable,
) -> ChartResult<IngestOutput> {
    // Per-target x mappings pull their columns out of the table first so the
    // remaining keys are all value series.
    let mut per_target_x: IndexMap<String, Vec<JsonValue>> = IndexMap::new();
    for (target_id, x_key) in &data.xs {
        let Some(column) = table.shift_remove(x_key) else {
            return Err(ChartError::InvalidConfig(format!(
                "data.xs names missing x column '{x_key}'"
            )));
        };
        per_target_x.insert(target_id.clone(), column);
    }

    let shared_x = match &data.x {
        Some(x_key) if data.xs.is_empty() => {
            let Some(column) = table.shift_remove(x_key) else {
                return Err(ChartError::InvalidConfig(format!(
                    "data.x names missing x column '{x_key}'"
                )));
            };
            Some(column)
        }
        _ => None,
    };

    let mut categories: Vec<String> = Vec::new();
    if x_kind == XAxisKind::Category {
        if let Some(column) = &shared_x {
            categories = column.iter().map(json_label).collect();
        }
    }

    let x_format = data.x_format.as_deref().unwrap_or(DEFAULT_X_FORMAT);
    let mut targets = Vec::with_capacity(table.len());
    for (id, column) in table {
        let x_column = per_target_x.get(&id).or(shared_x.as_ref());
        let mut values = Vec::with_capacity(column.len());
        for (index, cell) in column.iter().enumerate() {
            let x = derive_x(x_column, index, x_kind, x_format, &id);
            values.push(Value::new(x, json_number(cell, &id, index), index));
        }
        if data.x_sort {
            sort_and_reindex(&mut values);
        }
        let mut target =
            Target::new(id.clone(), data.kind_for(&id), values).with_axis(data.axis_for(&id));
        target.hidden = data.hide.iter().any(|hidden| hidden == &id);
        targets.push(target);
    }

    Ok(IngestOutput {
        targets,
        categories,
    })
}

/// Stable sort by x with unplaced (non-finite) x last, then dense re-index.
pub fn sort_and_reindex(values: &mut [Value]) {
    values.sort_by(|left, right| {
        let lx = if left.x.is_finite() {
            left.x
        } else {
            f64::INFINITY
        };
        let rx = if right.x.is_finite() {
            right.x
        } else {
            f64::INFINITY
        };
        lx.total_cmp(&rx)
    });
    for (index, value) in values.iter_mut().enumerate() {
        value.index = index;
    }
}

fn derive_x(
    x_column: Option<&Vec<JsonValue>>,
    index: usize,
    x_kind: XAxisKind,
    x_format: &str,
    target_id: &str,
) -> f64 {
    match x_kind {
        // Category labels come from the x column; positions are indices.
        XAxisKind::Category | XAxisKind::Indexed if x_column.is_none() => index as f64,
        XAxisKind::Category => index as f64,
        XAxisKind::Indexed => x_column
            .and_then(|column| column.get(index))
            .and_then(JsonValue::as_f64)
            .unwrap_or(index as f64),
        XAxisKind::Timeseries => match x_column.and_then(|column| column.get(index)) {
            Some(cell) => parse_time_x(cell, x_format, target_id, index),
            None => index as f64,
        },
    }
}

/// Parses one timeseries x cell into unix seconds.
///
/// A failed parse is a recoverable diagnostic: the value keeps its slot but
/// loses its position, rendering as a gap.
fn parse_time_x(cell: &JsonValue, x_format: &str, target_id: &str, index: usize) -> f64 {
    match cell {
        JsonValue::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        JsonValue::String(text) => parse_time_str(text, x_format).unwrap_or_else(|| {
            warn!(
                target_id,
                index,
                value = text.as_str(),
                "x value failed date parsing; treating as gap"
            );
            f64::NAN
        }),
        _ => f64::NAN,
    }
}

/// Tries datetime, date-only, then RFC 3339 interpretations.
pub fn parse_time_str(text: &str, format: &str) -> Option<f64> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
        return Some(datetime.and_utc().timestamp() as f64);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, format) {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp() as f64);
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(datetime.timestamp() as f64);
    }
    None
}

fn json_number(cell: &JsonValue, target_id: &str, index: usize) -> Option<f64> {
    match cell {
        JsonValue::Null => None,
        JsonValue::Number(number) => number.as_f64(),
        JsonValue::String(text) => match text.parse::<f64>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!(
                    target_id,
                    index,
                    value = text.as_str(),
                    "non-numeric value; treating as gap"
                );
                None
            }
        },
        _ => {
            warn!(target_id, index, "non-numeric value; treating as gap");
            None
        }
    }
}

fn json_label(cell: &JsonValue) -> String {
    match cell {
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Bounded cache from original (pre-conversion) ids to converted value
/// sequences, supporting fast replace-by-cached-id reloads.
#[derive(Debug, Clone)]
pub struct IngestCache {
    capacity: usize,
    entries: IndexMap<String, Vec<Value>>,
}

impl Default for IngestCache {
    fn default() -> Self {
        Self::with_capacity(16)
    }
}

impl IngestCache {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: IndexMap::new(),
        }
    }

    /// Inserts a converted series, evicting the least-recently-used entry
    /// when the cache is full.
    pub fn insert(&mut self, original_id: impl Into<String>, values: Vec<Value>) {
        let original_id = original_id.into();
        self.entries.shift_remove(&original_id);
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(original_id, values);
    }

    #[must_use]
    pub fn contains(&self, original_id: &str) -> bool {
        self.entries.contains_key(original_id)
    }

    /// Looks up a cached series, refreshing its recency.
    pub fn get(&mut self, original_id: &str) -> Option<Vec<Value>> {
        let values = self.entries.shift_remove(original_id)?;
        self.entries.insert(original_id.to_owned(), values.clone());
        Some(values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
