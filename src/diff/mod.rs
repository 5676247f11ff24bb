//! Structural diff between two schema snapshots.
//!
//! Pure computation: both snapshots are read-only inputs and the
//! result is the complete, ordered set of DDL needed to bring the
//! destination into agreement with the source. All I/O happens later
//! in the writer.

use crate::model::{SchemaSnapshot, TableSnapshot};

/// The ordered DDL statements for one table. Order within a batch is
/// replay order; batches for different tables are independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBatch {
    pub table: String,
    pub statements: Vec<String>,
}

impl StatementBatch {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// One table-level diff outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableDiff {
    /// Table exists only on the source side; the whole normalized
    /// CREATE is reused verbatim, no ALTER statements.
    Created { table: String, definition: String },
    /// Table exists on both sides. Every shared table is visited; an
    /// empty batch means the structures already agree.
    Altered { batch: StatementBatch },
    /// Table exists only on the destination side.
    Dropped { table: String },
}

/// Classifies every table in either snapshot. Source tables first
/// (created or altered, in name order), then destination-only tables
/// (dropped). Classification across tables is commutative; order
/// inside each batch is contractual.
pub fn compute_diff(source: &SchemaSnapshot, dest: &SchemaSnapshot) -> Vec<TableDiff> {
    let mut diffs = Vec::new();

    for (name, source_table) in &source.tables {
        match dest.tables.get(name) {
            None => diffs.push(TableDiff::Created {
                table: name.clone(),
                definition: source_table.definition.clone(),
            }),
            Some(dest_table) => diffs.push(TableDiff::Altered {
                batch: table_batch(source_table, dest_table),
            }),
        }
    }

    for name in dest.tables.keys() {
        if !source.tables.contains_key(name) {
            diffs.push(TableDiff::Dropped {
                table: name.clone(),
            });
        }
    }

    diffs
}

/// Builds one table's batch in the contractual order: column
/// adds/modifies (source order), column drops (destination order),
/// index adds/modifies (source order, a modify is drop-then-recreate),
/// index drops (destination order).
pub fn table_batch(source: &TableSnapshot, dest: &TableSnapshot) -> StatementBatch {
    let table = &source.name;
    let mut statements = Vec::new();

    for (name, column) in &source.columns {
        match dest.columns.get(name) {
            None => statements.push(add_column_sql(table, name, &column.attributes)),
            Some(dest_column) if dest_column.attributes != column.attributes => {
                statements.push(modify_column_sql(table, name, &column.attributes));
            }
            Some(_) => {}
        }
    }

    for name in dest.columns.keys() {
        if !source.columns.contains_key(name) {
            statements.push(drop_column_sql(table, name));
        }
    }

    for (name, index) in &source.indexes {
        match dest.indexes.get(name) {
            None => statements.push(add_index_sql(table, name, &index.attributes)),
            Some(dest_index) if dest_index.attributes != index.attributes => {
                // No in-place index alteration: always drop and
                // recreate, which stays portable across servers.
                statements.push(drop_index_sql(table, name));
                statements.push(add_index_sql(table, name, &index.attributes));
            }
            Some(_) => {}
        }
    }

    for name in dest.indexes.keys() {
        if !source.indexes.contains_key(name) {
            statements.push(drop_index_sql(table, name));
        }
    }

    StatementBatch {
        table: table.clone(),
        statements,
    }
}

pub fn add_column_sql(table: &str, column: &str, attributes: &str) -> String {
    format!("ALTER TABLE {table} ADD {column} {attributes};")
}

pub fn modify_column_sql(table: &str, column: &str, attributes: &str) -> String {
    format!("ALTER TABLE {table} MODIFY {column} {attributes};")
}

pub fn drop_column_sql(table: &str, column: &str) -> String {
    format!("ALTER TABLE {table} DROP {column};")
}

pub fn add_index_sql(table: &str, index: &str, columns: &str) -> String {
    format!("ALTER TABLE {table} ADD INDEX {index} {columns};")
}

pub fn drop_index_sql(table: &str, index: &str) -> String {
    format!("ALTER TABLE {table} DROP INDEX {index};")
}

pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE {table};")
}
