//! mysqldiff - MySQL table-structure diff with staged migration files.
//!
//! Compares the table structure of a source and a destination MySQL
//! database and writes one reviewable `.sql` file per differing table.
//! Nothing is executed until a separate apply phase, so a human (or
//! any other gate) sits between generation and execution.
//!
//! # Quick Start
//!
//! ```no_run
//! use mysqldiff::api::{apply_migration, build_migration};
//! use mysqldiff::mysql::MySqlConnection;
//! # async fn run(source: MySqlConnection, dest: MySqlConnection) -> mysqldiff::util::Result<()> {
//! let work_dir = std::path::Path::new("migrations");
//!
//! let report = build_migration(&source, &dest, work_dir).await?;
//! println!("{} file(s) to review", report.files_written());
//!
//! // ... operator reviews the generated files ...
//!
//! apply_migration(work_dir, &dest).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`api`] - Two-phase entry points (`build_migration` / `apply_migration`)
//! - [`model`] - Snapshot types (SchemaSnapshot, TableSnapshot, ...)
//! - [`parser`] - Line-based table-definition parser
//! - [`diff`] - Structural diff producing per-table statement batches
//! - [`writer`] - Per-table `.sql` file output

pub mod api;
pub mod apply;
pub mod cli;
pub mod config;
pub mod diff;
pub mod model;
pub mod mysql;
pub mod parser;
pub mod snapshot;
pub mod util;
pub mod writer;
