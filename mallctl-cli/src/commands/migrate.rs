//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;
use mallctl_core::MallConfig;
use mallctl_server::db::{create_pool, migrations};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config and DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config: MallConfig) -> Result<()> {
    let database_url = args
        .database_url
        .or(config.database.url)
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.mallctl/config.toml")?;

    let pool = create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;

    migrations::run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Schema is up to date");
    pool.close().await;
    Ok(())
}
