use crate::api::{apply_migration, build_migration};
use crate::config::Config;
use crate::mysql::MySqlConnection;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mysqldiff")]
#[command(about = "MySQL table-structure diff with staged migration files", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "mysqldiff.toml")]
    config: PathBuf,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    init_tracing(&config.log_level)?;

    info!(
        source = %format!("{}:{}/{}", config.source.host, config.source.port, config.source.dbname),
        dest = %format!("{}:{}/{}", config.dest.host, config.dest.port, config.dest.dbname),
        work_dir = %config.work_dir.display(),
        "starting"
    );

    let source = MySqlConnection::new(&config.source).await?;
    let dest = MySqlConnection::new(&config.dest).await?;

    let build = build_migration(&source, &dest, &config.work_dir).await?;
    if !build.failed.is_empty() {
        warn!(tables = ?build.failed, "some tables could not be written; review before continuing");
    }

    // Leftover files from an earlier failed apply are pending too.
    let pending = crate::apply::pending_sql_files(&config.work_dir)?;
    if pending.is_empty() {
        info!("schemas already agree, nothing to apply");
        return Ok(());
    }
    info!(files = pending.len(), "migration files awaiting review");

    if !confirm_apply(&config.work_dir)? {
        info!("aborted by operator; generated files were kept for review");
        return Ok(());
    }

    let apply = apply_migration(&config.work_dir, &dest).await?;
    info!(applied = apply.applied, failed = apply.failed.len(), "apply phase complete");
    if !apply.failed.is_empty() {
        warn!(files = ?apply.failed, "failed files were left unrenamed; fix and re-run");
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let level = tracing::Level::from_str(log_level)
        .with_context(|| format!("invalid log_level {log_level:?}"))?;
    tracing_subscriber::fmt().with_max_level(level).init();
    Ok(())
}

/// The manual gate between the build and apply phases: every generated
/// file must be reviewed by a human before anything executes.
fn confirm_apply(work_dir: &std::path::Path) -> Result<bool> {
    println!("=====================================================================");
    println!("Build phase finished.");
    println!("Review every generated .sql file under {} now.", work_dir.display());
    println!("Applying unreviewed statements can be catastrophic for the database.");
    println!("=====================================================================");
    print!("Type 'yes' to apply, anything else to abort: ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
