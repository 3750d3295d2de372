use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mallctl_core::MallConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with default values
    Init(InitArgs),
    /// Print the effective config (file + environment) as TOML
    Show,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, path: Option<&Path>) -> Result<()> {
    let config_path = path.map_or_else(MallConfig::config_path, Path::to_path_buf);
    match args.command {
        ConfigCommands::Init(args) => run_init(args, &config_path),
        ConfigCommands::Show => run_show(path),
        ConfigCommands::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn run_init(args: InitArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }

    let content = MallConfig::default().to_toml()?;
    std::fs::write(config_path, content)
        .context(format!("Failed to write config file: {:?}", config_path))?;

    println!("Created config at: {}", config_path.display());
    Ok(())
}

fn run_show(path: Option<&Path>) -> Result<()> {
    print!("{}", load_effective(path)?.to_toml()?);
    Ok(())
}

/// Effective config: `--config` file or the default location, then env.
pub fn load_effective(path: Option<&Path>) -> Result<MallConfig> {
    match path {
        Some(path) => {
            let mut config = MallConfig::load_from(path)?;
            config.apply_env()?;
            Ok(config)
        }
        None => MallConfig::load(),
    }
}
