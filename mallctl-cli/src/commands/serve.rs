//! HTTP server command for the goods admin API

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mallctl_core::MallConfig;
use mallctl_server::db::{create_pool_with_options, migrations};
use mallctl_server::{run_server, share, GoodsService, GoodsStore, MemoryStore, PgStore, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides [server].bind, default: 127.0.0.1:8080)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config and DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Keep everything in memory instead of Postgres; data is lost on exit
    #[arg(long, conflicts_with = "database_url")]
    pub memory: bool,

    /// Skip running migrations on startup
    #[arg(long)]
    pub no_migrate: bool,

    /// Base URL for goods share images (overrides [share].base_url)
    #[arg(long, value_name = "URL")]
    pub share_base_url: Option<String>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: MallConfig) -> Result<()> {
    let server_config = ServerConfig {
        bind_addr: args.bind.unwrap_or(config.server.bind),
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
    };

    let store: Arc<dyn GoodsStore> = if args.memory {
        tracing::warn!("Using in-memory store; nothing will be persisted");
        Arc::new(MemoryStore::new())
    } else {
        let database_url = args
            .database_url
            .or(config.database.url)
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.mallctl/config.toml")?;

        let pool = create_pool_with_options(&database_url, config.database.max_connections)
            .await
            .context("Failed to create database pool")?;

        if !args.no_migrate {
            migrations::run(&pool)
                .await
                .context("Failed to run database migrations")?;
        }

        Arc::new(PgStore::new(pool))
    };

    let share_base = args.share_base_url.or(config.share.base_url);
    let share = share::from_base_url(share_base.as_deref());
    let goods = GoodsService::new(store, share);

    tracing::info!(
        bind = %server_config.bind_addr,
        memory = args.memory,
        share = share_base.as_deref().unwrap_or("disabled"),
        "Starting mallctl server"
    );

    // Run server (blocks until shutdown)
    run_server(goods, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
