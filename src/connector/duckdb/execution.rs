//! Blocking statement execution against a DuckDB file.
//!
//! Each call opens its own read-only connection, executes exactly one
//! statement, materializes the full result eagerly, and closes the
//! connection by dropping it; there is no pooling and no reuse. The
//! connection's interrupt handle is handed back to the async supervisor
//! before execution starts so cancellation can reach the live statement.

use std::sync::Arc;

use duckdb::types::Value as EngineValue;
use duckdb::{AccessMode, Config, Connection, InterruptHandle};
use tokio::sync::oneshot;

use crate::error::{ConnectorError, Result};
use crate::models::{ColumnDescriptor, QueryOutcome, ResultSet, Row};

/// Opens the database read-only, publishes the interrupt handle, executes
/// `sql`, and returns the normalized outcome. The connection is dropped on
/// every exit path.
pub(crate) fn open_and_execute(
    db_path: &str,
    sql: &str,
    interrupt_tx: oneshot::Sender<Arc<InterruptHandle>>,
) -> Result<QueryOutcome> {
    let conn = open_read_only(db_path)?;
    // The supervisor may already have given up; a dropped receiver just
    // means nobody will ask for an interrupt.
    let _ = interrupt_tx.send(conn.interrupt_handle());
    execute_statement(&conn, sql)
}

fn open_read_only(db_path: &str) -> Result<Connection> {
    let config = Config::default()
        .access_mode(AccessMode::ReadOnly)
        .map_err(|e| ConnectorError::connection_failed("invalid engine configuration", e))?;

    Connection::open_with_flags(db_path, config).map_err(|e| {
        ConnectorError::connection_failed(format!("could not open database file '{db_path}'"), e)
    })
}

/// Executes a single statement and materializes all rows.
///
/// The duckdb crate only exposes column metadata after a statement has
/// executed, so raw cell values are collected first and column names are
/// read afterwards (rows are then re-keyed by name in column order).
fn execute_statement(conn: &Connection, sql: &str) -> Result<QueryOutcome> {
    let mut stmt = conn.prepare(sql).map_err(engine_error)?;

    let mapped = stmt
        .query_map([], |row| {
            let width = row.as_ref().column_count();
            let mut cells = Vec::with_capacity(width);
            for index in 0..width {
                let value: EngineValue = row.get(index)?;
                cells.push(engine_value_to_json(&value));
            }
            Ok(cells)
        })
        .map_err(engine_error)?;

    let mut raw_rows = Vec::new();
    for cells in mapped {
        raw_rows.push(cells.map_err(engine_error)?);
    }

    let width = stmt.column_count();
    if width == 0 {
        // Statement executed but had no result columns; reported, not raised.
        return Ok(QueryOutcome::NoData);
    }

    let columns: Vec<ColumnDescriptor> = (0..width)
        .map(|index| {
            let name = stmt
                .column_name(index)
                .map(|name| name.to_string())
                .unwrap_or_else(|_| format!("col_{index}"));
            ColumnDescriptor::untyped(name)
        })
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|cells| {
            let mut row = Row::new();
            for (column, cell) in columns.iter().zip(cells) {
                row.insert(column.name.clone(), cell);
            }
            row
        })
        .collect();

    Ok(QueryOutcome::Rows(ResultSet { columns, rows }))
}

fn engine_error(error: duckdb::Error) -> ConnectorError {
    ConnectorError::execution(error.to_string())
}

/// Converts an engine value into the JSON scalar the host receives.
///
/// Integers and text map directly; floats that JSON cannot represent
/// (NaN, infinities) become null. Temporal, decimal, blob and nested types
/// the host has no shape for fall back to their engine rendering as text.
pub(crate) fn engine_value_to_json(value: &EngineValue) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        EngineValue::Null => Json::Null,
        EngineValue::Boolean(v) => Json::Bool(*v),
        EngineValue::TinyInt(v) => Json::from(*v),
        EngineValue::SmallInt(v) => Json::from(*v),
        EngineValue::Int(v) => Json::from(*v),
        EngineValue::BigInt(v) => Json::from(*v),
        EngineValue::UTinyInt(v) => Json::from(*v),
        EngineValue::USmallInt(v) => Json::from(*v),
        EngineValue::UInt(v) => Json::from(*v),
        EngineValue::UBigInt(v) => Json::from(*v),
        EngineValue::HugeInt(v) => match i64::try_from(*v) {
            Ok(narrow) => Json::from(narrow),
            Err(_) => Json::String(v.to_string()),
        },
        EngineValue::Float(v) => {
            serde_json::Number::from_f64(f64::from(*v)).map_or(Json::Null, Json::Number)
        }
        EngineValue::Double(v) => {
            serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number)
        }
        EngineValue::Text(v) => Json::String(v.clone()),
        EngineValue::Enum(v) => Json::String(v.clone()),
        EngineValue::List(items) => {
            Json::Array(items.iter().map(engine_value_to_json).collect())
        }
        other => Json::String(format!("{other:?}")),
    }
}
