//! Isosceles CLI - isosceles command

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli_lib::cmd;

/// Isosceles - Watch project folders and rsync changes to remote hosts
#[derive(Parser)]
#[command(name = "isosceles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch every enabled project and sync changes until `q` is entered
    #[command(alias = "as")]
    ActiveSync,
    /// List every configured project
    #[command(alias = "ap")]
    AllProjects,
    /// List enabled projects
    #[command(alias = "ep")]
    EnabledProjects,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, listings to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ActiveSync => cmd::active_sync::run().await,
        Commands::AllProjects => cmd::projects::run_all(),
        Commands::EnabledProjects => cmd::projects::run_enabled(),
    }
}
