use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One database's table structure at a point in time.
///
/// Built either by introspecting a live connection or by re-parsing a
/// previously written scratch directory; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SchemaSnapshot {
    pub tables: BTreeMap<String, TableSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSnapshot {
    pub name: String,
    pub columns: BTreeMap<String, ColumnDefinition>,
    pub indexes: BTreeMap<String, IndexDefinition>,
    /// Full normalized CREATE TABLE text, reused verbatim when the
    /// table exists only on the source side.
    pub definition: String,
}

/// A column and its full type/attribute clause, exactly as the server
/// reports it. Two columns compare equal only if the clause is
/// byte-equal; no type-syntax normalization happens here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub attributes: String,
}

/// An index and its parenthesized column-list clause. Same byte-exact
/// equality rule as [`ColumnDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexDefinition {
    pub name: String,
    pub attributes: String,
}

impl SchemaSnapshot {
    pub fn new() -> Self {
        SchemaSnapshot {
            tables: BTreeMap::new(),
        }
    }

    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let json = serde_json::to_string(self).expect("snapshot must serialize");
        let hash = Sha256::digest(json.as_bytes());
        hex::encode(hash)
    }
}

impl TableSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        TableSnapshot {
            name: name.into(),
            columns: BTreeMap::new(),
            indexes: BTreeMap::new(),
            definition: String::new(),
        }
    }

    /// Reconstructs a CREATE TABLE block from the parsed members.
    ///
    /// Primary keys and the engine/charset footer were discarded at
    /// parse time, so they do not reappear here; re-parsing the result
    /// yields the same columns and indexes.
    pub fn render_definition(&self) -> String {
        let mut lines = Vec::with_capacity(self.columns.len() + self.indexes.len() + 2);
        lines.push(format!("CREATE TABLE {} (", self.name));
        for column in self.columns.values() {
            lines.push(format!("  {} {},", column.name, column.attributes));
        }
        for index in self.indexes.values() {
            lines.push(format!("  KEY {} {},", index.name, index.attributes));
        }
        lines.push(");".to_string());
        lines.join("\n")
    }
}
