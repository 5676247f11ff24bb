//! Apply phase: execute reviewed `.sql` files against the destination
//! and mark processed files with a `.PASS` suffix.
//!
//! Each file is independent. A statement failure leaves its file
//! unrenamed for manual inspection and moves on to the next file; an
//! un-renamed file after this phase is the definitive signal that a
//! table needs attention.

use crate::mysql::MySqlConnection;
use crate::util::{Result, SchemaError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome counts for one apply phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    /// Files left unrenamed because a statement failed.
    pub failed: Vec<String>,
}

pub async fn apply_migration(work_dir: &Path, dest: &MySqlConnection) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();

    for path in pending_sql_files(work_dir)? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match apply_file(&path, dest).await {
            Ok(count) => {
                info!(file = %file_name, statements = count, "applied");
                let passed = path.with_file_name(format!("{file_name}.PASS"));
                if let Err(e) = std::fs::rename(&path, &passed) {
                    warn!(file = %file_name, error = %e, "applied but could not rename");
                }
                report.applied += 1;
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "apply failed, file left for inspection");
                report.failed.push(file_name);
            }
        }
    }

    Ok(report)
}

/// Regular `.sql` files directly under the working directory, in
/// lexicographic filename order. Subdirectories (including the two
/// scratch directories) and already-processed `.PASS` files are
/// skipped.
pub fn pending_sql_files(work_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(work_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".sql"))
        })
        .collect();
    files.sort();
    Ok(files)
}

async fn apply_file(path: &Path, dest: &MySqlConnection) -> Result<usize> {
    let file = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Apply {
        file: file.clone(),
        message: e.to_string(),
    })?;
    let statements = split_statements(&content);

    for statement in &statements {
        sqlx::query(statement)
            .execute(dest.pool())
            .await
            .map_err(|e| SchemaError::Apply {
                file: file.clone(),
                message: format!("executing [{statement}]: {e}"),
            })?;
    }

    Ok(statements.len())
}

/// Splits file content into executable statements: blank and `--`
/// comment lines are dropped, the rest is split on `;`, and empty
/// fragments (like the one after a trailing terminator) are ignored.
pub fn split_statements(content: &str) -> Vec<String> {
    let joined: String = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    joined
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn split_drops_comments_blanks_and_trailing_terminator() {
        let content = "-- review me\n\nALTER TABLE t ADD a int(11);\nALTER TABLE t DROP b;\n";
        assert_eq!(
            split_statements(content),
            vec!["ALTER TABLE t ADD a int(11)", "ALTER TABLE t DROP b"]
        );
    }

    #[test]
    fn split_keeps_multi_line_statements_together() {
        let content = "CREATE TABLE t (\n  id bigint(20) NOT NULL,\n);\n";
        let statements = split_statements(content);
        assert_eq!(statements.len(), 1);
        assert!(statements[0].starts_with("CREATE TABLE t ("));
        assert!(statements[0].contains("id bigint(20) NOT NULL"));
    }

    #[test]
    fn pending_files_skip_pass_files_and_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.sql"), "").unwrap();
        std::fs::write(dir.path().join("a.sql"), "").unwrap();
        std::fs::write(dir.path().join("done.sql.PASS"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("src_mysql_tmp")).unwrap();

        let files = pending_sql_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.sql", "b.sql"]);
    }
}
