use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use twinmode_config::TwinmodeConfig;
use twinmode_engine::{run_rot13, run_www};
use twinmode_telemetry::EventLogger;

#[derive(Parser)]
#[command(name = "twinmode", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the www front end
    Www(ServeArgs),
    /// Serve the ROT-13 transform service
    Rot13(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Configuration file; defaults to config/twinmode.yaml plus environment overrides
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn load_config(args: &ServeArgs) -> anyhow::Result<TwinmodeConfig> {
    match &args.config {
        Some(path) => TwinmodeConfig::load_from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => TwinmodeConfig::load().context("loading configuration"),
    }
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Www(args) => {
            let config = load_config(&args)?;
            EventLogger::init(&config.telemetry.log_level);
            info!(?config, "starting www");
            run_www(&config).await?;
        }
        Commands::Rot13(args) => {
            let config = load_config(&args)?;
            EventLogger::init(&config.telemetry.log_level);
            info!(?config, "starting rot13 service");
            run_rot13(&config).await?;
        }
    }
    Ok(())
}
