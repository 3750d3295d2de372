//! mallctl CLI - goods administration server for the mall admin UI
//!
//! Subcommands:
//! - `serve`: run the admin HTTP API (Postgres, or in-memory with `--memory`)
//! - `migrate`: create or update the database schema
//! - `config`: inspect the effective configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "mallctl",
    author,
    version,
    about = "Goods administration server for the mall admin UI",
    long_about = "List, create, edit and retire goods together with their specifications, \
                  attributes and products, over a JSON HTTP API backed by Postgres."
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces via OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Config file to use instead of ~/.mallctl/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the goods admin HTTP server
    Serve(commands::serve::ServeArgs),
    /// Apply database migrations and exit
    Migrate(commands::migrate::MigrateArgs),
    /// Inspect mallctl configuration (show, path)
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG may come from a .env file
    let env_files = mallctl_core::load_dotenv();

    let _tracing = tracing_setup::init(tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    if env_files.is_empty() {
        tracing::debug!("No .env files found (current dir or ~/.mallctl)");
    } else {
        for path in &env_files {
            tracing::debug!("Loaded .env from {}", path.display());
        }
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Config(args) => commands::run_config(args, config_path),
        Commands::Serve(args) => {
            let config = commands::config::load_effective(config_path)?;
            commands::run_serve(args, config).await
        }
        Commands::Migrate(args) => {
            let config = commands::config::load_effective(config_path)?;
            commands::run_migrate(args, config).await
        }
    }
}
