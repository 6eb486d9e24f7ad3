//! Replace a user's weight history with the contents of a JSON file
//!
//! Usage: `weight-tracker-import <file.json> [username]`

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use weight_tracker_backend::{config::AppConfig, db, observability, services::ImportService};

#[derive(Parser)]
#[command(name = "weight-tracker-import")]
#[command(about = "Import weight history for one user", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON array of { date, weight, clothesApplied } records
    file: PathBuf,

    /// User to import for; defaults to the configured default user
    username: Option<String>,

    /// Skip running migrations before the import
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_tracing(AppConfig::is_production());

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let username = cli
        .username
        .or_else(|| config.auth.default_user.clone())
        .context("no username given and no default user configured")?;

    let json = tokio::fs::read_to_string(&cli.file)
        .await
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let pool = db::create_pool(&config.database).await?;
    if !cli.no_migrate {
        db::run_migrations(&pool).await?;
    }

    let summary = ImportService::run(&pool, &username, &json).await?;

    info!(
        username = %summary.username,
        created_user = summary.created_user,
        imported = summary.imported,
        skipped = summary.skipped,
        "Import finished"
    );

    pool.close().await;
    Ok(())
}
