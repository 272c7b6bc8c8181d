//! Data models for normalized query results and schema listings.
//!
//! These are the shapes the host consumes: a columnar `{columns, rows}`
//! result set for queries and a `[{name, columns}]` listing for schema
//! introspection. Everything serializes with serde; row key order follows
//! column order (serde_json is built with `preserve_order`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fixed user-visible message for statements that complete without
/// producing a describable result.
pub const NO_DATA_MESSAGE: &str = "Query completed but it returned no data.";

/// A single result-set column.
///
/// `column_type` is only known for introspection results, where it comes
/// from the engine catalog. Generic query results carry `None` because the
/// driver does not expose static types ahead of execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name as reported by the engine.
    pub name: String,
    /// Catalog type name, when known.
    #[serde(rename = "type")]
    pub column_type: Option<String>,
}

impl ColumnDescriptor {
    /// A descriptor with no static type, as produced for query results.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: None,
        }
    }
}

/// One result row: column name → scalar JSON value, keyed in column order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A fully materialized query result.
///
/// Invariant: every row's key set equals the column name set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    /// Column descriptors in engine order.
    pub columns: Vec<ColumnDescriptor>,
    /// All rows, materialized eagerly (no streaming or pagination).
    pub rows: Vec<Row>,
}

/// Outcome of a successfully executed statement.
///
/// No-data is a reported condition, not an error: the statement ran but had
/// no result columns (e.g. a pragma with no output). Execution failures and
/// cancellation are [`crate::error::ConnectorError`] values instead.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The statement produced a result set.
    Rows(ResultSet),
    /// The statement completed but produced no describable result.
    NoData,
}

impl QueryOutcome {
    /// The result set, if the statement produced one.
    pub fn into_result_set(self) -> Option<ResultSet> {
        match self {
            Self::Rows(result_set) => Some(result_set),
            Self::NoData => None,
        }
    }
}

/// A column in a schema listing; the type is always known here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    /// Column name.
    pub name: String,
    /// Catalog type name, e.g. `INTEGER` or `VARCHAR`.
    #[serde(rename = "type")]
    pub column_type: String,
}

/// One table in a schema listing, with its columns in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Table name.
    pub name: String,
    /// Columns in the order the engine reports them.
    pub columns: Vec<SchemaColumn>,
}

impl SchemaEntry {
    /// Creates an entry with no columns yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }
}

/// Table name → entry, in discovery order. Hosts may pass a pre-seeded map
/// into `get_tables`; re-discovered tables keep their seeded position.
pub type SchemaMap = IndexMap<String, SchemaEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_set_serializes_to_host_shape() {
        let mut row = Row::new();
        row.insert("id".to_string(), serde_json::json!(1));
        row.insert("label".to_string(), serde_json::json!("a"));

        let result_set = ResultSet {
            columns: vec![
                ColumnDescriptor::untyped("id"),
                ColumnDescriptor::untyped("label"),
            ],
            rows: vec![row],
        };

        let json = serde_json::to_value(&result_set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "columns": [
                    {"name": "id", "type": null},
                    {"name": "label", "type": null},
                ],
                "rows": [{"id": 1, "label": "a"}],
            })
        );
    }

    #[test]
    fn test_row_keys_preserve_column_order() {
        let mut row = Row::new();
        row.insert("zebra".to_string(), serde_json::json!(1));
        row.insert("apple".to_string(), serde_json::json!(2));

        let encoded = serde_json::to_string(&row).unwrap();
        assert!(encoded.find("zebra").unwrap() < encoded.find("apple").unwrap());
    }

    #[test]
    fn test_schema_entry_serializes_with_type_field() {
        let entry = SchemaEntry {
            name: "t2".to_string(),
            columns: vec![
                SchemaColumn {
                    name: "col_b".to_string(),
                    column_type: "VARCHAR".to_string(),
                },
                SchemaColumn {
                    name: "col_c".to_string(),
                    column_type: "DOUBLE".to_string(),
                },
            ],
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "t2",
                "columns": [
                    {"name": "col_b", "type": "VARCHAR"},
                    {"name": "col_c", "type": "DOUBLE"},
                ],
            })
        );
    }

    #[test]
    fn test_schema_map_keeps_seed_position_on_overwrite() {
        let mut schema = SchemaMap::new();
        schema.insert("t1".to_string(), SchemaEntry::new("t1"));
        schema.insert("t2".to_string(), SchemaEntry::new("t2"));

        // Re-inserting t1 must not move it to the back.
        schema.insert("t1".to_string(), SchemaEntry::new("t1"));
        let order: Vec<&str> = schema.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["t1", "t2"]);
    }

    #[test]
    fn test_query_outcome_into_result_set() {
        assert!(QueryOutcome::NoData.into_result_set().is_none());
        assert!(
            QueryOutcome::Rows(ResultSet::default())
                .into_result_set()
                .is_some()
        );
    }
}
