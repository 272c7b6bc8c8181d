//! Schema introspection over the engine catalog.
//!
//! Two fixed statements drive the scan: `SHOW ALL TABLES` to enumerate
//! tables and `PRAGMA table_info(...)` per table for its columns. Both run
//! through the ordinary query path, so each opens and closes its own
//! read-only connection.

use crate::connector::DatabaseConnector;
use crate::error::{ConnectorError, Result};
use crate::models::{SchemaColumn, SchemaEntry, SchemaMap};

pub(super) const LIST_TABLES_SQL: &str = "SHOW ALL TABLES";

/// Builds the per-table describe statement.
///
/// The table name comes from the engine's own catalog, but it is still
/// embedded as an escaped string literal (quotes doubled) rather than by
/// raw substitution.
pub(super) fn table_info_sql(table: &str) -> String {
    format!("PRAGMA table_info('{}')", table.replace('\'', "''"))
}

/// Enumerates tables and their columns into `schema`, returning the entries
/// in map order (seed order first, then discovery order).
///
/// A failure of the listing statement is fatal
/// ([`ConnectorError::SchemaIntrospection`]); a failure of a per-table
/// describe aborts the scan and propagates unchanged (see DESIGN.md).
pub(super) async fn get_tables(
    connector: &dyn DatabaseConnector,
    mut schema: SchemaMap,
) -> Result<Vec<SchemaEntry>> {
    let listing = connector.run_query(LIST_TABLES_SQL).await.map_err(|error| {
        tracing::error!(%error, "table listing failed");
        ConnectorError::schema_introspection(error.to_string())
    })?;

    let Some(result_set) = listing.into_result_set() else {
        return Err(ConnectorError::schema_introspection(
            "table listing returned no result",
        ));
    };

    for row in &result_set.rows {
        let Some(table_name) = row.get("name").and_then(serde_json::Value::as_str) else {
            return Err(ConnectorError::schema_introspection(
                "table listing row is missing a 'name' field",
            ));
        };

        let described = connector.run_query(&table_info_sql(table_name)).await?;

        let mut entry = SchemaEntry::new(table_name);
        if let Some(columns) = described.into_result_set() {
            for column_row in &columns.rows {
                let name = column_row.get("name").and_then(serde_json::Value::as_str);
                let column_type = column_row.get("type").and_then(serde_json::Value::as_str);
                if let (Some(name), Some(column_type)) = (name, column_type) {
                    entry.columns.push(SchemaColumn {
                        name: name.to_string(),
                        column_type: column_type.to_string(),
                    });
                }
            }
        }

        tracing::debug!(table = table_name, columns = entry.columns.len(), "described table");
        schema.insert(table_name.to_string(), entry);
    }

    tracing::info!(tables = schema.len(), "schema introspection complete");
    Ok(schema.into_values().collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::models::{ColumnDescriptor, QueryOutcome, ResultSet, Row};

    #[test]
    fn test_table_info_sql_plain_name() {
        assert_eq!(table_info_sql("events"), "PRAGMA table_info('events')");
    }

    #[test]
    fn test_table_info_sql_escapes_quotes() {
        assert_eq!(
            table_info_sql("o'brien"),
            "PRAGMA table_info('o''brien')"
        );
    }

    /// Connector double that answers the two introspection statements from
    /// a script and records every statement it is asked to run.
    #[derive(Default)]
    struct ScriptedConnector {
        statements: Mutex<Vec<String>>,
    }

    fn listing_of(names: &[&str]) -> QueryOutcome {
        let rows = names
            .iter()
            .map(|name| {
                let mut row = Row::new();
                row.insert("name".to_string(), serde_json::json!(name));
                row
            })
            .collect();
        QueryOutcome::Rows(ResultSet {
            columns: vec![ColumnDescriptor::untyped("name")],
            rows,
        })
    }

    fn one_column_table() -> QueryOutcome {
        let mut row = Row::new();
        row.insert("name".to_string(), serde_json::json!("col_a"));
        row.insert("type".to_string(), serde_json::json!("INTEGER"));
        QueryOutcome::Rows(ResultSet {
            columns: vec![
                ColumnDescriptor::untyped("name"),
                ColumnDescriptor::untyped("type"),
            ],
            rows: vec![row],
        })
    }

    #[async_trait]
    impl DatabaseConnector for ScriptedConnector {
        async fn test_connection(&self) -> Result<()> {
            Ok(())
        }

        async fn run_query(&self, sql: &str) -> Result<QueryOutcome> {
            self.statements.lock().unwrap().push(sql.to_string());
            if sql == LIST_TABLES_SQL {
                return Ok(listing_of(&["t1", "t2", "t3"]));
            }
            if sql == table_info_sql("t2") {
                return Err(ConnectorError::execution(
                    "Catalog Error: Table with name t2 does not exist!",
                ));
            }
            Ok(one_column_table())
        }

        async fn run_query_with_cancel(
            &self,
            sql: &str,
            _cancel: &CancellationToken,
        ) -> Result<QueryOutcome> {
            self.run_query(sql).await
        }

        async fn get_tables(&self, seed: SchemaMap) -> Result<Vec<SchemaEntry>> {
            get_tables(self, seed).await
        }
    }

    #[tokio::test]
    async fn test_describe_failure_aborts_the_scan() {
        let connector = ScriptedConnector::default();

        // t2's describe fails; the scan must stop there, propagate the
        // execution error unchanged, and return no partial schema.
        let error = get_tables(&connector, SchemaMap::new()).await.unwrap_err();
        assert!(matches!(error, ConnectorError::Execution { .. }));
        assert!(error.to_string().contains("Catalog Error"));

        let statements = connector.statements.lock().unwrap();
        assert!(statements.contains(&table_info_sql("t1")));
        assert!(statements.contains(&table_info_sql("t2")));
        assert!(
            !statements.contains(&table_info_sql("t3")),
            "scan continued past the failing table"
        );
    }

    #[tokio::test]
    async fn test_listing_without_result_is_fatal() {
        struct EmptyListing;

        #[async_trait]
        impl DatabaseConnector for EmptyListing {
            async fn test_connection(&self) -> Result<()> {
                Ok(())
            }

            async fn run_query(&self, _sql: &str) -> Result<QueryOutcome> {
                Ok(QueryOutcome::NoData)
            }

            async fn run_query_with_cancel(
                &self,
                sql: &str,
                _cancel: &CancellationToken,
            ) -> Result<QueryOutcome> {
                self.run_query(sql).await
            }

            async fn get_tables(&self, seed: SchemaMap) -> Result<Vec<SchemaEntry>> {
                get_tables(self, seed).await
            }
        }

        let error = get_tables(&EmptyListing, SchemaMap::new())
            .await
            .unwrap_err();
        assert!(matches!(error, ConnectorError::SchemaIntrospection { .. }));
    }
}
