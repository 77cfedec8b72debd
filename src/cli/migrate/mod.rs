//! Migrate command - manages the PostgreSQL schema

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{connect_pool, PostgresMigrator, SCHEMA_MIGRATIONS};

/// Arguments for the migrate command
#[derive(Args, Clone)]
pub struct MigrateArgs {
    /// Revert the most recent applied migration instead of applying
    #[arg(long)]
    pub revert: bool,

    /// Print the current schema version and exit
    #[arg(long)]
    pub status: bool,
}

/// Apply, revert or inspect the schema migrations
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let pool = connect_pool(&config.storage.postgres).await?;
    let migrator = PostgresMigrator::new(pool);

    if args.status {
        match migrator.current_version().await? {
            Some(version) => info!("Schema at version {}", version),
            None => info!("No migrations applied"),
        }
        return Ok(());
    }

    if args.revert {
        match migrator.revert_latest(SCHEMA_MIGRATIONS).await? {
            Some(version) => info!("Reverted migration {}", version),
            None => info!("No migrations to revert"),
        }
        return Ok(());
    }

    let ran = migrator.apply_pending(SCHEMA_MIGRATIONS).await?;
    info!("Migrations applied: {} new", ran);

    Ok(())
}
