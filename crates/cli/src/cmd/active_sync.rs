//! Watch enabled projects and sync them until told to stop

use crate::display;
use crate::locks::ActiveSyncLock;
use crate::orchestrator::Orchestrator;
use crate::shutdown::{self, QuitReason};
use anyhow::{Context, Result};
use iso_core::{config, Notification};
use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run() -> Result<()> {
    let config_path = config::config_file_path().context("Could not determine config file path")?;
    let config = config::load_from(&config_path).context("Failed to load config file")?;

    let _lock = ActiveSyncLock::acquire(&config_path)?;

    println!("{}", "Enabled Projects:".bold());
    display::print_projects(&config.only_enabled());

    let orchestrator = Orchestrator::system(&config.settings);
    orchestrator.announce(&Notification::config_loaded(
        config.projects.len(),
        config.invalid_count(),
    ));

    let running = orchestrator.start(&config, CancellationToken::new());

    if running.workers.is_empty() {
        warn!("No enabled project could be started");
    }

    println!();
    println!(
        "{}",
        "Starting Active Sync... press q + return to exit".green()
    );

    let reason = shutdown::wait_for_quit().await;
    match reason {
        QuitReason::Quit => info!("Quit requested"),
        QuitReason::Interrupt => info!("Interrupted"),
        QuitReason::Closed => warn!("No way left to receive a quit request, stopping"),
    }

    running.shutdown().await;
    println!("Active sync stopped");
    Ok(())
}
