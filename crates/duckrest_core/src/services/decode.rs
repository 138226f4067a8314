//! Response decoding.
//!
//! Turns success bodies into models and failure bodies into error messages.
//! Decoders never fill in defaults for missing fields; the single exception
//! is a query reporting zero rows, which yields an empty result.

use serde_json::{Map, Value};

use crate::error::{DuckRestError, Result};
use crate::models::{
    DatabaseInfo, Endpoint, ExecutionResult, TableSchema, TableSummary, TabularResult,
};

/// Longest raw error body kept in a server error message.
const MAX_ERROR_BODY_CHARS: usize = 1000;

/// Parse a success body, which must be a JSON object.
pub fn parse_body(endpoint: Endpoint, body: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DuckRestError::decode(
            endpoint.name(),
            format!("expected a JSON object, got {}", type_name(&other)),
        )),
        Err(e) => Err(DuckRestError::decode(endpoint.name(), format!("invalid JSON body: {e}"))),
    }
}

/// `GET /health`: any object is accepted.
pub fn decode_health(map: Map<String, Value>) -> Map<String, Value> {
    map
}

/// `GET /info`: `{table_count, tables}`, returned as-is once both fields check out.
pub fn decode_info(map: Map<String, Value>) -> Result<Map<String, Value>> {
    DatabaseInfo::from_map(&map)?;
    Ok(map)
}

/// `GET /tables`: `{tables: [{table, rows}, ...]}`.
pub fn decode_tables(mut map: Map<String, Value>) -> Result<TabularResult> {
    let endpoint = Endpoint::Tables.name();
    let tables = take_array(endpoint, &mut map, "tables")?;
    for entry in &tables {
        TableSummary::from_value(endpoint, entry)?;
    }
    records_to_tabular(endpoint, "tables", tables)
}

/// `GET /schema/{table}`: the `schema` list only. `table` and `row_count`
/// must still be present.
pub fn decode_schema_columns(map: Map<String, Value>) -> Result<TabularResult> {
    decode_table_schema(map).map(|schema| schema.columns)
}

/// `GET /schema/{table}`: `{table, row_count, schema: [...]}`.
pub fn decode_table_schema(mut map: Map<String, Value>) -> Result<TableSchema> {
    let endpoint = Endpoint::Schema.name();
    let table = match map.remove("table") {
        Some(Value::String(table)) => table,
        Some(_) => return Err(DuckRestError::decode_field(endpoint, "table", "expected a string")),
        None => return Err(missing(endpoint, "table")),
    };
    let row_count = require_u64(endpoint, &map, "row_count")?;
    let schema = take_array(endpoint, &mut map, "schema")?;
    let columns = records_to_tabular(endpoint, "schema", schema)?;
    Ok(TableSchema { table, row_count, columns })
}

/// `POST /query`: `{rows, data}`.
///
/// `rows == 0` is a successful empty result regardless of `data`. For
/// `rows > 0`, `data` must hold exactly `rows` objects.
pub fn decode_query(mut map: Map<String, Value>) -> Result<TabularResult> {
    let endpoint = Endpoint::Query.name();
    let rows = require_u64(endpoint, &map, "rows")?;
    if rows == 0 {
        return Ok(TabularResult::empty());
    }

    let data = take_array(endpoint, &mut map, "data")?;
    if data.len() as u64 != rows {
        return Err(DuckRestError::decode_field(
            endpoint,
            "data",
            format!("server reported {rows} rows but sent {} records", data.len()),
        ));
    }
    records_to_tabular(endpoint, "data", data)
}

/// `POST /execute`: `{message, ...}`.
pub fn decode_execute(mut map: Map<String, Value>) -> Result<ExecutionResult> {
    let endpoint = Endpoint::Execute.name();
    let message = match map.shift_remove("message") {
        Some(Value::String(message)) => message,
        Some(_) => {
            return Err(DuckRestError::decode_field(endpoint, "message", "expected a string"))
        }
        None => return Err(missing(endpoint, "message")),
    };
    Ok(ExecutionResult { message, extra: map })
}

/// Pull a human-readable message out of a failure body.
///
/// Looks for `detail`, `error` and `message` keys in a JSON object, then
/// falls back to the trimmed body text. Empty bodies give `None`.
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["detail", "error", "message"] {
            match map.get(key) {
                Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(s)) = inner.get("message") {
                        return Some(s.clone());
                    }
                    return Some(Value::Object(inner.clone()).to_string());
                }
                Some(Value::Array(items)) if !items.is_empty() => {
                    return Some(Value::Array(items.clone()).to_string());
                }
                _ => {}
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.chars().take(MAX_ERROR_BODY_CHARS).collect())
    }
}

// ========== Helpers ==========

fn records_to_tabular(endpoint: &str, field: &str, records: Vec<Value>) -> Result<TabularResult> {
    let maps = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| match record {
            Value::Object(map) => Ok(map),
            other => Err(DuckRestError::decode_field(
                endpoint,
                field,
                format!("record {i} is {}, expected an object", type_name(&other)),
            )),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(TabularResult::from_records(maps))
}

fn take_array(endpoint: &str, map: &mut Map<String, Value>, field: &str) -> Result<Vec<Value>> {
    match map.remove(field) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(DuckRestError::decode_field(
            endpoint,
            field,
            format!("expected an array, got {}", type_name(&other)),
        )),
        None => Err(missing(endpoint, field)),
    }
}

fn require_u64(endpoint: &str, map: &Map<String, Value>, field: &str) -> Result<u64> {
    match map.get(field) {
        Some(value) => value.as_u64().ok_or_else(|| {
            DuckRestError::decode_field(
                endpoint,
                field,
                format!("expected a non-negative integer, got {value}"),
            )
        }),
        None => Err(missing(endpoint, field)),
    }
}

fn missing(endpoint: &str, field: &str) -> DuckRestError {
    DuckRestError::decode_field(endpoint, field, format!("missing required field `{field}`"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
