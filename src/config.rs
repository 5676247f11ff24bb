use crate::util::{Result, SchemaError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Run configuration read from a TOML file.
///
/// Constructed once at startup and passed down explicitly; nothing in
/// the crate reads configuration from shared state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory that receives the reviewable `.sql` files and the two
    /// per-side scratch subdirectories.
    pub work_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub source: DbConfig,
    pub dest: DbConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub dbname: String,
    #[serde(default = "default_charset")]
    pub charset: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_charset() -> String {
    "utf8mb4".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SchemaError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| SchemaError::Config(format!("cannot parse {}: {e}", path.display())))
    }
}
