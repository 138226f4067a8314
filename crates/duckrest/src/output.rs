//! JSON rendering of command results.
//!
//! Results go to stdout, errors to stderr, so output can be piped into `jq`.

use std::io::Write;

use duckrest_core::ExecutionResult;
use serde::Serialize;

use crate::error::CliError;

/// One line of `run` output.
#[derive(Debug, Serialize)]
pub struct StatementOutcome<'a> {
    /// 1-based position in the script.
    pub statement: usize,
    pub sql: &'a str,
    /// Server response, kept apart so its metadata keys cannot collide with ours.
    pub result: &'a ExecutionResult,
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    write_pretty(&mut out, value)?;
    out.flush()?;
    Ok(())
}

/// Print one statement outcome as a single JSON line on stdout.
pub fn print_statement(
    statement: usize,
    sql: &str,
    result: &ExecutionResult,
) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    write_line(&mut out, &StatementOutcome { statement, sql, result })?;
    out.flush()?;
    Ok(())
}

/// Print an error document on stderr. Failures to write are ignored.
pub fn print_error(error: &CliError) {
    let mut err = std::io::stderr().lock();
    let _ = write_pretty(&mut err, &error.to_error_info());
}

fn write_pretty<W: Write, T: Serialize>(writer: &mut W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

fn write_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckrest_core::TabularResult;
    use serde_json::{json, Map, Value};

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_tabular_result_renders_as_records() {
        let result = TabularResult::from_records(vec![
            record(json!({ "a": 1, "b": "x" })),
            record(json!({ "a": 2, "b": "y" })),
        ]);

        let mut buf = Vec::new();
        write_pretty(&mut buf, &result).unwrap();
        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, json!([{ "a": 1, "b": "x" }, { "a": 2, "b": "y" }]));
        assert!(buf.ends_with(b"\n"));
    }

    #[test]
    fn test_statement_outcome_is_one_line() {
        let result = ExecutionResult {
            message: "Query executed successfully".into(),
            extra: record(json!({ "rows_affected": 1, "sql": "echoed", "statement": 9 })),
        };
        let outcome =
            StatementOutcome { statement: 2, sql: "INSERT INTO t VALUES (1)", result: &result };

        let mut buf = Vec::new();
        write_line(&mut buf, &outcome).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({
                "statement": 2,
                "sql": "INSERT INTO t VALUES (1)",
                "result": {
                    "message": "Query executed successfully",
                    "rows_affected": 1,
                    "sql": "echoed",
                    "statement": 9
                }
            })
        );
    }
}
