//! Schema snapshotter: pulls every table definition from one side,
//! normalizes volatile values, and persists one file per table in a
//! scratch directory.

use crate::model::SchemaSnapshot;
use crate::mysql::MySqlConnection;
use crate::parser;
use crate::util::{ensure_terminated, normalize_auto_increment, Result, SchemaError};
use crate::writer;
use sqlx::Row;
use std::path::Path;
use tracing::{debug, warn};

const SHOW_TABLES_SQL: &str = "SHOW TABLES";

/// Captures one database's structure into `scratch_dir` and returns
/// the parsed snapshot.
///
/// Query failures abort the snapshot; a table whose definition query
/// does not come back as the expected (name, definition) pair is
/// skipped with a warning rather than aborting the run.
pub async fn snapshot_schema(
    conn: &MySqlConnection,
    scratch_dir: &Path,
) -> Result<SchemaSnapshot> {
    std::fs::create_dir_all(scratch_dir)?;

    let table_names = list_tables(conn).await?;
    let mut snapshot = SchemaSnapshot::new();

    for table_name in table_names {
        let Some(definition) = show_create_table(conn, &table_name).await? else {
            continue;
        };

        let definition = ensure_terminated(&normalize_auto_increment(&definition));
        writer::create_sql_file(scratch_dir, &table_name, &definition).map_err(|e| {
            SchemaError::Snapshot(format!("cannot persist definition for {table_name}: {e}"))
        })?;

        let (table, warnings) = parser::parse_table_definition(&table_name, &definition);
        for warning in &warnings {
            warn!(table = %table_name, "{warning}");
        }
        debug!(table = %table_name, columns = table.columns.len(), indexes = table.indexes.len(), "captured table");
        snapshot.tables.insert(table_name, table);
    }

    Ok(snapshot)
}

async fn list_tables(conn: &MySqlConnection) -> Result<Vec<String>> {
    let rows = sqlx::query(SHOW_TABLES_SQL)
        .fetch_all(conn.pool())
        .await
        .map_err(|e| SchemaError::Snapshot(format!("cannot list tables: {e}")))?;

    let mut names = Vec::with_capacity(rows.len());
    for row in rows {
        let name: String = row
            .try_get(0)
            .map_err(|e| SchemaError::Snapshot(format!("cannot read table name: {e}")))?;
        names.push(name);
    }

    Ok(names)
}

/// Returns the definition text, or `None` when the result set does not
/// have the expected two columns (name, definition) for this server.
async fn show_create_table(conn: &MySqlConnection, table: &str) -> Result<Option<String>> {
    let query = format!("SHOW CREATE TABLE `{table}`");
    let row = sqlx::query(&query)
        .fetch_one(conn.pool())
        .await
        .map_err(|e| SchemaError::Snapshot(format!("cannot read definition of {table}: {e}")))?;

    if row.columns().len() != 2 {
        warn!(
            table,
            columns = row.columns().len(),
            "unexpected definition result shape, skipping table"
        );
        return Ok(None);
    }

    let definition: String = row
        .try_get(1)
        .map_err(|e| SchemaError::Snapshot(format!("cannot read definition of {table}: {e}")))?;

    Ok(Some(definition))
}
