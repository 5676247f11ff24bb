use regex::Regex;
use thiserror::Error;

/// Rewrites the auto-increment counter in a CREATE TABLE definition to
/// a fixed placeholder.
///
/// The counter reflects insert history, not structure; two databases
/// with identical tables but different row counts must still compare
/// as equal. This is the single normalization rule applied at snapshot
/// time.
pub fn normalize_auto_increment(definition: &str) -> String {
    let re = Regex::new(r"AUTO_INCREMENT=\w+").unwrap();
    re.replace_all(definition, "AUTO_INCREMENT=1").to_string()
}

/// Guarantees the definition text ends with a statement terminator
/// before it is written to its per-table file.
pub fn ensure_terminated(definition: &str) -> String {
    if definition.ends_with(';') {
        definition.to_string()
    } else {
        format!("{definition};")
    }
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Cannot read table definition: {0}")]
    TableRead(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Write error for table {table}: {message}")]
    Write { table: String, message: String },

    #[error("Apply error in {file}: {message}")]
    Apply { file: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_auto_increment_rewrites_counter() {
        let input = ") ENGINE=InnoDB AUTO_INCREMENT=403 DEFAULT CHARSET=utf8;";
        let expected = ") ENGINE=InnoDB AUTO_INCREMENT=1 DEFAULT CHARSET=utf8;";
        assert_eq!(normalize_auto_increment(input), expected);
    }

    #[test]
    fn normalize_auto_increment_leaves_other_text_alone() {
        let input = "CREATE TABLE t (\n  id bigint(20) NOT NULL,\n);";
        assert_eq!(normalize_auto_increment(input), input);
    }

    #[test]
    fn differing_counters_normalize_to_the_same_text() {
        let a = ") ENGINE=InnoDB AUTO_INCREMENT=17;";
        let b = ") ENGINE=InnoDB AUTO_INCREMENT=403;";
        assert_eq!(normalize_auto_increment(a), normalize_auto_increment(b));
    }

    #[test]
    fn ensure_terminated_appends_semicolon_once() {
        assert_eq!(ensure_terminated("DROP TABLE t"), "DROP TABLE t;");
        assert_eq!(ensure_terminated("DROP TABLE t;"), "DROP TABLE t;");
    }
}
