//! `active-sync`

use crate::common::{ProjectEntry, TestHome};
use crate::iso;
use anyhow::Result;
use cli_lib::locks::ActiveSyncLock;
use std::time::Duration;

#[test]
fn test_active_sync_quits_on_q() -> Result<()> {
    let home = TestHome::new()?;
    let site = home.project_dir("site")?;
    let off = home.project_dir("off")?;
    home.write_config(&[
        ProjectEntry::new("site", &site).initial_sync(),
        ProjectEntry::new("off", &off).disabled(),
    ])?;

    let result = iso!(home, "active-sync").stdin("q\n").assert_success()?;

    assert!(result.contains_stdout("Enabled Projects:"));
    assert!(result.contains_stdout("[site]"));
    assert!(!result.contains_stdout("[off]"));
    assert!(result.contains_stdout("Starting Active Sync"));
    assert!(result.duration < Duration::from_secs(20));

    // Lock is released on exit
    assert!(!ActiveSyncLock::path_for(&home.config_path()).exists());
    Ok(())
}

#[test]
fn test_active_sync_alias() -> Result<()> {
    let home = TestHome::new()?;
    let site = home.project_dir("site")?;
    home.write_config(&[ProjectEntry::new("site", &site)])?;

    let result = iso!(home, "as").stdin("q\n").assert_success()?;
    assert!(result.contains_stdout("Starting Active Sync"));
    Ok(())
}

#[test]
fn test_active_sync_keeps_going_with_invalid_project() -> Result<()> {
    let home = TestHome::new()?;
    let site = home.project_dir("site")?;
    home.write_config(&[
        ProjectEntry::new("broken", home.path().join("missing")),
        ProjectEntry::new("site", &site),
    ])?;

    let result = iso!(home, "active-sync").stdin("q\n").assert_success()?;

    assert!(result.contains_stdout("[broken]"));
    assert!(result.contains_stderr("Skipping Project: [broken]"));
    Ok(())
}

#[test]
fn test_active_sync_fails_on_malformed_config() -> Result<()> {
    let home = TestHome::new()?;
    home.write_raw_config("not = [valid")?;

    let result = iso!(home, "active-sync").stdin("q\n").assert_failure()?;

    assert!(result.contains_stderr("Failed to load config file"));
    assert!(!result.contains_stdout("Starting Active Sync"));
    Ok(())
}

#[test]
fn test_second_active_sync_refused() -> Result<()> {
    let home = TestHome::new()?;
    let site = home.project_dir("site")?;
    home.write_config(&[ProjectEntry::new("site", &site)])?;

    let _held = ActiveSyncLock::acquire(&home.config_path())?;

    let result = iso!(home, "active-sync").stdin("q\n").assert_failure()?;
    assert!(result.contains_stderr("Active sync already running"));
    Ok(())
}
