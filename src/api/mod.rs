//! Two-phase entry points for embedding.
//!
//! The build phase snapshots both sides and writes reviewable `.sql`
//! files; the apply phase executes them. Nothing here knows how the
//! caller gates the step in between: any confirmation mechanism
//! (blocking prompt, approval webhook, timer) can sit between the two
//! calls.

use crate::diff::compute_diff;
use crate::mysql::MySqlConnection;
use crate::snapshot::snapshot_schema;
use crate::util::Result;
use crate::writer::{write_diff, BuildReport};
use std::path::Path;
use tracing::info;

pub use crate::apply::{apply_migration, ApplyReport};

pub const SOURCE_SCRATCH_DIR: &str = "src_mysql_tmp";
pub const DEST_SCRATCH_DIR: &str = "dest_mysql_tmp";

/// Snapshots source and destination into the work directory's scratch
/// subdirectories, diffs them, and writes one `.sql` file per
/// differing table into the work directory itself.
pub async fn build_migration(
    source: &MySqlConnection,
    dest: &MySqlConnection,
    work_dir: &Path,
) -> Result<BuildReport> {
    let source_snapshot = snapshot_schema(source, &work_dir.join(SOURCE_SCRATCH_DIR)).await?;
    info!(
        tables = source_snapshot.tables.len(),
        fingerprint = %source_snapshot.fingerprint(),
        "source snapshot complete"
    );

    let dest_snapshot = snapshot_schema(dest, &work_dir.join(DEST_SCRATCH_DIR)).await?;
    info!(
        tables = dest_snapshot.tables.len(),
        fingerprint = %dest_snapshot.fingerprint(),
        "destination snapshot complete"
    );

    let diffs = compute_diff(&source_snapshot, &dest_snapshot);
    let report = write_diff(work_dir, &diffs);
    info!(
        created = report.created,
        altered = report.altered,
        dropped = report.dropped,
        unchanged = report.unchanged,
        failed = report.failed.len(),
        "build phase complete"
    );

    Ok(report)
}
