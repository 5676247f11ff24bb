//! Migration-file writer: one `.sql` file per differing table in the
//! working directory, statements in emission order.

use crate::diff::{drop_table_sql, TableDiff};
use crate::util::{Result, SchemaError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Outcome counts for one build phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub created: usize,
    pub altered: usize,
    pub dropped: usize,
    pub unchanged: usize,
    /// Tables whose file could not be written; their statements are
    /// missing or partial and must be regenerated.
    pub failed: Vec<String>,
}

impl BuildReport {
    pub fn files_written(&self) -> usize {
        self.created + self.altered + self.dropped
    }
}

fn sql_path(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("{table}.sql"))
}

/// Truncates (or creates) `<dir>/<table>.sql` and writes the content
/// followed by one line terminator.
pub fn create_sql_file(dir: &Path, table: &str, content: &str) -> Result<()> {
    let path = sql_path(dir, table);
    let mut file = std::fs::File::create(&path).map_err(|e| SchemaError::Write {
        table: table.to_string(),
        message: format!("cannot create {}: {e}", path.display()),
    })?;

    writeln!(file, "{content}").map_err(|e| SchemaError::Write {
        table: table.to_string(),
        message: format!("cannot write {}: {e}", path.display()),
    })
}

/// Opens `<dir>/<table>.sql` for read/write/append (creating it if
/// missing) and adds the content followed by one line terminator.
/// No locking: concurrent writers to the same file are unsupported.
pub fn append_sql_file(dir: &Path, table: &str, content: &str) -> Result<()> {
    let path = sql_path(dir, table);
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(&path)
        .map_err(|e| SchemaError::Write {
            table: table.to_string(),
            message: format!("cannot open {}: {e}", path.display()),
        })?;

    writeln!(file, "{content}").map_err(|e| SchemaError::Write {
        table: table.to_string(),
        message: format!("cannot append to {}: {e}", path.display()),
    })
}

/// Renders every diff outcome into the working directory.
///
/// A write failure abandons that table's remaining statements and
/// moves on; files already written for other tables stay in place
/// (output is not transactional across tables).
pub fn write_diff(work_dir: &Path, diffs: &[TableDiff]) -> BuildReport {
    let mut report = BuildReport::default();

    for diff in diffs {
        let outcome = match diff {
            TableDiff::Created { table, definition } => {
                create_sql_file(work_dir, table, definition).map(|()| {
                    info!(table = %table, "new table, definition copied");
                    report.created += 1;
                })
            }
            TableDiff::Altered { batch } => {
                if batch.is_empty() {
                    report.unchanged += 1;
                    Ok(())
                } else {
                    write_batch(work_dir, &batch.table, &batch.statements).map(|()| {
                        info!(table = %batch.table, statements = batch.statements.len(), "table changed");
                        report.altered += 1;
                    })
                }
            }
            TableDiff::Dropped { table } => {
                create_sql_file(work_dir, table, &drop_table_sql(table)).map(|()| {
                    info!(table = %table, "table removed");
                    report.dropped += 1;
                })
            }
        };

        if let Err(e) = outcome {
            let table = match diff {
                TableDiff::Created { table, .. } | TableDiff::Dropped { table } => table,
                TableDiff::Altered { batch } => &batch.table,
            };
            error!(table = %table, error = %e, "abandoning table output");
            report.failed.push(table.clone());
        }
    }

    report
}

fn write_batch(work_dir: &Path, table: &str, statements: &[String]) -> Result<()> {
    for statement in statements {
        append_sql_file(work_dir, table, statement)?;
    }
    Ok(())
}
