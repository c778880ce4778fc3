//! Project listing commands

use crate::display;
use anyhow::Result;
use iso_core::{config, Config};

/// List every configured project
pub fn run_all() -> Result<()> {
    let config = load_or_report();
    display::print_projects(&config);
    Ok(())
}

/// List projects with `enabled = true`
pub fn run_enabled() -> Result<()> {
    let config = load_or_report();
    display::print_projects(&config.only_enabled());
    Ok(())
}

/// A broken config file is reported and listed as empty
fn load_or_report() -> Config {
    match config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[ERROR - Config File]: {}", e);
            Config::default()
        }
    }
}
