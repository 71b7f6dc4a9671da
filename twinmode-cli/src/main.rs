//! ## twinmode-cli
//! **Process entry point**
//! Starts either the www front end or the ROT-13 service it depends on.

use clap::Parser;

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli).await
}
