//! Typed views over database metadata responses.
//!
//! `get_info()` returns its mapping as-is; these types are an opt-in way to
//! read it without hand-walking JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::TabularResult;
use crate::error::{DuckRestError, Result};

/// One entry of a table listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    /// Table name.
    pub table: String,
    /// Row count reported by the server.
    pub rows: u64,
}

impl TableSummary {
    /// Parse a `{table, rows}` object. `endpoint` names the response for errors.
    pub(crate) fn from_value(endpoint: &str, value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            DuckRestError::decode_field(endpoint, "tables", "table entry is not an object")
        })?;
        let table = obj.get("table").and_then(Value::as_str).ok_or_else(|| {
            DuckRestError::decode_field(endpoint, "table", "expected a string table name")
        })?;
        let rows = obj.get("rows").and_then(Value::as_u64).ok_or_else(|| {
            DuckRestError::decode_field(endpoint, "rows", "expected a non-negative integer")
        })?;
        Ok(Self { table: table.to_string(), rows })
    }
}

/// Overall database information from `GET /info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    /// Number of tables.
    pub table_count: u64,
    /// Per-table row counts.
    pub tables: Vec<TableSummary>,
}

impl DatabaseInfo {
    /// Read a typed view out of the mapping returned by `get_info()`.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let table_count = map.get("table_count").and_then(Value::as_u64).ok_or_else(|| {
            DuckRestError::decode_field("info", "table_count", "expected a non-negative integer")
        })?;
        let tables = map
            .get("tables")
            .and_then(Value::as_array)
            .ok_or_else(|| DuckRestError::decode_field("info", "tables", "expected an array"))?
            .iter()
            .map(|v| TableSummary::from_value("info", v))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { table_count, tables })
    }

    /// Sum of row counts over all tables.
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// Table description from `GET /schema/{table}`.
///
/// Serializes back to the wire shape `{table, row_count, schema}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    /// Table name as echoed by the server.
    pub table: String,
    /// Row count reported by the server.
    pub row_count: u64,
    /// One row per column of the table.
    #[serde(rename = "schema")]
    pub columns: TabularResult,
}

impl TabularResult {
    /// Read a `list_tables()` result as typed summaries.
    pub fn table_summaries(&self) -> Result<Vec<TableSummary>> {
        self.records().map(|r| TableSummary::from_value("tables", &Value::Object(r))).collect()
    }
}
