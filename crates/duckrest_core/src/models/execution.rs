//! Results of write and DDL statements.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded response of `POST /execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Server status message.
    pub message: String,
    /// Any other metadata the server reported, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExecutionResult {
    /// Rows affected, if the server reported a count.
    pub fn rows_affected(&self) -> Option<u64> {
        ["rows_affected", "affected_rows"]
            .iter()
            .find_map(|key| self.extra.get(*key).and_then(Value::as_u64))
    }
}
