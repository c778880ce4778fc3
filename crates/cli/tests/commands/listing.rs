//! `all-projects` and `enabled-projects`

use crate::common::{ProjectEntry, TestHome};
use crate::iso;
use anyhow::Result;

#[test]
fn test_all_projects_lists_valid_and_invalid() -> Result<()> {
    let home = TestHome::new()?;
    let site = home.project_dir("site")?;
    home.write_config(&[
        ProjectEntry::new("site", &site),
        ProjectEntry::new("broken", home.path().join("missing")),
    ])?;

    let result = iso!(home, "all-projects").assert_success()?;

    assert!(result.contains_stdout("[site]"));
    assert!(result.contains_stdout("[broken]"));
    assert!(result.contains_stdout("X"));
    assert!(result.contains_stdout("local folder looks bad"));
    assert!(result.contains_stdout("http://dev.example.com/site"));
    Ok(())
}

#[test]
fn test_enabled_projects_hides_disabled() -> Result<()> {
    let home = TestHome::new()?;
    let on = home.project_dir("on")?;
    let off = home.project_dir("off")?;
    home.write_config(&[
        ProjectEntry::new("on", &on),
        ProjectEntry::new("off", &off).disabled(),
    ])?;

    let result = iso!(home, "ep").assert_success()?;
    assert!(result.contains_stdout("[on]"));
    assert!(!result.contains_stdout("[off]"));

    let result = iso!(home, "ap").assert_success()?;
    assert!(result.contains_stdout("[off]"));
    Ok(())
}

#[test]
fn test_listing_survives_malformed_config() -> Result<()> {
    let home = TestHome::new()?;
    home.write_raw_config("[project.site\nenabled = ")?;

    let result = iso!(home, "all-projects").assert_success()?;

    assert!(result.contains_stderr("[ERROR - Config File]"));
    assert!(result.contains_stdout("No projects configured"));
    Ok(())
}

#[test]
fn test_listing_without_config_file() -> Result<()> {
    let home = TestHome::new()?;

    let result = iso!(home, "enabled-projects").assert_success()?;

    assert!(result.contains_stderr("[ERROR - Config File]"));
    Ok(())
}
