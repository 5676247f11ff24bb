//! Line-based parser for MySQL table definitions.
//!
//! A definition is the text of `SHOW CREATE TABLE` (or a scratch file
//! written from one). Attribute clauses are kept as opaque strings;
//! the diff contract is byte-exact equality, so nothing here tries to
//! understand type syntax. One malformed line never fails the table:
//! it is skipped and reported as a [`ParseWarning`] so the caller can
//! decide how loudly to surface it.

use crate::model::{ColumnDefinition, IndexDefinition, SchemaSnapshot, TableSnapshot};
use crate::util::{Result, SchemaError};
use std::path::Path;
use tracing::warn;

/// A definition line the parser could not interpret and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    MalformedColumnLine { line: String },
    MalformedIndexLine { line: String },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::MalformedColumnLine { line } => {
                write!(f, "malformed column line skipped: {line}")
            }
            ParseWarning::MalformedIndexLine { line } => {
                write!(f, "malformed index line skipped: {line}")
            }
        }
    }
}

/// Parses one table's full definition text.
///
/// Always returns a snapshot, possibly with zero columns and indexes;
/// completeness assertions belong to the caller. The primary key line
/// and the engine/charset footer are discarded, not diffed.
pub fn parse_table_definition(name: &str, text: &str) -> (TableSnapshot, Vec<ParseWarning>) {
    let mut table = TableSnapshot::new(name);
    table.definition = text.to_string();
    let mut warnings = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with("--") {
            continue;
        }
        if line.starts_with("CREATE TABLE") || line.starts_with(')') {
            continue;
        }
        if line.starts_with("PRIMARY KEY") {
            continue;
        }

        if line.starts_with("KEY") {
            match parse_index_line(line) {
                Some(index) => {
                    table.indexes.insert(index.name.clone(), index);
                }
                None => warnings.push(ParseWarning::MalformedIndexLine {
                    line: line.to_string(),
                }),
            }
        } else {
            match parse_column_line(line) {
                Some(column) => {
                    table.columns.insert(column.name.clone(), column);
                }
                None => warnings.push(ParseWarning::MalformedColumnLine {
                    line: line.to_string(),
                }),
            }
        }
    }

    (table, warnings)
}

/// Column line: name up to the first space (identifier quoting kept),
/// the rest is the attribute clause minus one trailing field comma.
fn parse_column_line(line: &str) -> Option<ColumnDefinition> {
    let idx = line.find(' ')?;
    let name = &line[..idx];
    let rest = &line[idx + 1..];
    let attributes = rest.strip_suffix(',').unwrap_or(rest);

    Some(ColumnDefinition {
        name: name.to_string(),
        attributes: attributes.to_string(),
    })
}

/// Index line: exactly `KEY <name> <column-list>`, split on single
/// spaces. Any other token count is malformed.
fn parse_index_line(line: &str) -> Option<IndexDefinition> {
    let items: Vec<&str> = line.split(' ').collect();
    if items.len() != 3 {
        return None;
    }

    let attributes = items[2].strip_suffix(',').unwrap_or(items[2]);
    Some(IndexDefinition {
        name: items[1].to_string(),
        attributes: attributes.to_string(),
    })
}

/// Rehydrates a snapshot from a scratch directory holding one
/// `<table>.sql` file per table, using the same parsing rules as the
/// live path so a partially processed directory stays diff-consistent.
///
/// Subdirectories and non-`.sql` entries are ignored. A file that
/// cannot be read is skipped with a warning; an unreadable directory
/// is fatal.
pub fn load_snapshot_dir(dir: &Path) -> Result<SchemaSnapshot> {
    let mut snapshot = SchemaSnapshot::new();

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(table_name) = file_name.strip_suffix(".sql") else {
            continue;
        };

        let (table, warnings) = match load_table_file(&path, table_name) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable definition file");
                continue;
            }
        };
        for warning in &warnings {
            warn!(table = table_name, "{warning}");
        }
        snapshot.tables.insert(table_name.to_string(), table);
    }

    Ok(snapshot)
}

/// Reads and parses a single definition file.
pub fn load_table_file(path: &Path, table_name: &str) -> Result<(TableSnapshot, Vec<ParseWarning>)> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SchemaError::TableRead(format!("{}: {e}", path.display())))?;
    Ok(parse_table_definition(table_name, &text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAMPAIGN: &str = "CREATE TABLE `jzl_campaign` (
  `id` bigint(20) NOT NULL AUTO_INCREMENT,
  `cid` bigint(20) NOT NULL DEFAULT '0',
  `campaign_name` varchar(128) NOT NULL DEFAULT '',
  PRIMARY KEY (`id`),
  KEY `cid_delete_time` (`cid`,`is_delete`,`create_time`)
) ENGINE=InnoDB DEFAULT CHARSET=utf8;";

    #[test]
    fn parses_columns_and_indexes() {
        let (table, warnings) = parse_table_definition("jzl_campaign", CAMPAIGN);
        assert!(warnings.is_empty());

        assert_eq!(table.columns.len(), 3);
        assert_eq!(
            table.columns["`cid`"].attributes,
            "bigint(20) NOT NULL DEFAULT '0'"
        );
        assert_eq!(
            table.indexes["`cid_delete_time`"].attributes,
            "(`cid`,`is_delete`,`create_time`)"
        );
    }

    #[test]
    fn discards_primary_key_head_and_footer() {
        let (table, _) = parse_table_definition("jzl_campaign", CAMPAIGN);
        assert!(!table.columns.contains_key("PRIMARY"));
        assert!(table.columns.keys().all(|k| k.starts_with('`')));
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "CREATE TABLE t (\n\n-- comment\n  id bigint(20) NOT NULL,\n);";
        let (table, warnings) = parse_table_definition("t", text);
        assert!(warnings.is_empty());
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn malformed_column_line_is_skipped_with_warning() {
        let text = "CREATE TABLE t (\n  lonely_token\n  id bigint(20) NOT NULL,\n);";
        let (table, warnings) = parse_table_definition("t", text);

        assert_eq!(table.columns.len(), 1);
        assert_eq!(
            warnings,
            vec![ParseWarning::MalformedColumnLine {
                line: "lonely_token".to_string()
            }]
        );
    }

    #[test]
    fn malformed_index_line_is_skipped_with_warning() {
        let text = "CREATE TABLE t (\n  KEY too many tokens here,\n  KEY idx_a (a),\n);";
        let (table, warnings) = parse_table_definition("t", text);

        assert_eq!(table.indexes.len(), 1);
        assert!(table.indexes.contains_key("idx_a"));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            ParseWarning::MalformedIndexLine { .. }
        ));
    }

    #[test]
    fn only_one_trailing_comma_is_stripped() {
        let text = "CREATE TABLE t (\n  a int(11),,\n  KEY idx_a (a),,\n);";
        let (table, warnings) = parse_table_definition("t", text);

        assert!(warnings.is_empty());
        assert_eq!(table.columns["a"].attributes, "int(11),");
        assert_eq!(table.indexes["idx_a"].attributes, "(a),");
    }

    #[test]
    fn empty_definition_yields_empty_snapshot() {
        let (table, warnings) = parse_table_definition("t", "");
        assert!(table.columns.is_empty());
        assert!(table.indexes.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn render_then_reparse_is_identity() {
        let (table, _) = parse_table_definition("jzl_campaign", CAMPAIGN);
        let rendered = table.render_definition();
        let (reparsed, warnings) = parse_table_definition("jzl_campaign", &rendered);

        assert!(warnings.is_empty());
        assert_eq!(reparsed.columns, table.columns);
        assert_eq!(reparsed.indexes, table.indexes);
    }

    #[test]
    fn load_snapshot_dir_skips_non_sql_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("users.sql"), CAMPAIGN).unwrap();
        std::fs::write(dir.path().join("README.md"), "not sql").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let snapshot = load_snapshot_dir(dir.path()).unwrap();
        assert_eq!(snapshot.tables.len(), 1);
        assert!(snapshot.tables.contains_key("users"));
    }
}
