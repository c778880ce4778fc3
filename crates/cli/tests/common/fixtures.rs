//! Temporary home directories with an isosceles config file

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One `[project.<name>]` table
#[derive(Debug, Clone)]
pub struct ProjectEntry {
    pub name: String,
    pub enabled: bool,
    pub local_folder: PathBuf,
    pub initial_sync: bool,
}

impl ProjectEntry {
    pub fn new(name: &str, local_folder: impl AsRef<Path>) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            local_folder: local_folder.as_ref().to_path_buf(),
            initial_sync: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn initial_sync(mut self) -> Self {
        self.initial_sync = true;
        self
    }

    fn to_toml(&self) -> String {
        format!(
            "\n[project.{}]\nenabled = {}\nhost = \"dev.example.com\"\nlocal_folder = \"{}\"\nremote_folder = \"/srv/{}\"\nurl = \"http://dev.example.com/{}\"\ncooldown = 1\ninitial_sync = {}\n",
            self.name,
            self.enabled,
            self.local_folder.display(),
            self.name,
            self.name,
            self.initial_sync
        )
    }
}

/// Isolated `$HOME` holding `.isosceles.toml`
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp home")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(".isosceles.toml")
    }

    /// Create a project folder under the home directory
    pub fn project_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.dir.path().join("projects").join(name);
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("index.html"), "<html></html>")?;
        Ok(dir)
    }

    /// Write settings (transfers run `true`) and the given projects
    pub fn write_config(&self, projects: &[ProjectEntry]) -> Result<()> {
        let mut text = String::from("[settings]\nrsync_path = \"true\"\nmin_interval_ms = 100\n");
        for project in projects {
            let _ = write!(text, "{}", project.to_toml());
        }
        self.write_raw_config(&text)
    }

    pub fn write_raw_config(&self, text: &str) -> Result<()> {
        std::fs::write(self.config_path(), text).context("Failed to write config")
    }
}
