//! Configuration loading
//!
//! The configuration is a TOML file (default `~/.isosceles.toml`, override
//! with `ISOSCELES_CONFIG`) holding optional global `[settings]` and one
//! `[project.<name>]` table per watched project. It is read once at startup.

use crate::error::ConfigError;
use crate::project::{NotifyPrefs, ProjectDescriptor, ProjectStatus};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "ISOSCELES_CONFIG";

/// Config file name inside the home directory
pub const CONFIG_FILE_NAME: &str = ".isosceles.toml";

const DEFAULT_RSYNC_PATH: &str = "rsync";
const DEFAULT_MIN_INTERVAL_MS: u64 = 500;
const DEFAULT_COOLDOWN_SECS: u64 = 1;
const DEFAULT_WATCH_PATTERN: &str = ".*";

/// Longest accepted cooldown (one day)
pub const MAX_COOLDOWN_SECS: u64 = 86_400;

/// Longest accepted spacing between runs (one hour)
pub const MAX_MIN_INTERVAL_MS: u64 = 3_600_000;

/// Global settings shared by every project
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Transfer program (default: `rsync` from `PATH`)
    #[serde(default = "default_rsync_path")]
    pub rsync_path: String,

    /// Minimum spacing between the end of one run and the start of the
    /// next run for the same project
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

impl Settings {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rsync_path: default_rsync_path(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

fn default_rsync_path() -> String {
    DEFAULT_RSYNC_PATH.to_string()
}

fn default_min_interval_ms() -> u64 {
    DEFAULT_MIN_INTERVAL_MS
}

fn default_cooldown() -> u64 {
    DEFAULT_COOLDOWN_SECS
}

fn default_watch_pattern() -> String {
    DEFAULT_WATCH_PATTERN.to_string()
}

/// One `[project.<name>]` table as written by the user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectConfig {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    host: String,
    #[serde(default)]
    local_folder: String,
    #[serde(default)]
    remote_folder: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default = "default_cooldown")]
    cooldown: u64,
    #[serde(default = "default_watch_pattern")]
    watch_pattern: String,
    #[serde(default)]
    rsync_args: Vec<String>,
    #[serde(default)]
    initial_sync: bool,
    #[serde(default)]
    open_browser: bool,
    #[serde(default)]
    desktop_notify: bool,
    #[serde(default)]
    desktop_notify_sound: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    project: BTreeMap<String, ProjectConfig>,
}

/// Loaded configuration: settings plus every project, valid or not
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: Settings,
    /// Projects keyed (and therefore listed) by name
    pub projects: BTreeMap<String, Arc<ProjectDescriptor>>,
}

impl Config {
    /// Parse configuration text and validate every project
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if file.settings.min_interval_ms > MAX_MIN_INTERVAL_MS {
            return Err(ConfigError::Settings {
                path: path.to_path_buf(),
                reason: format!(
                    "min_interval_ms out of range: {} (max {})",
                    file.settings.min_interval_ms, MAX_MIN_INTERVAL_MS
                ),
            });
        }

        let projects = file
            .project
            .into_iter()
            .map(|(name, raw)| {
                let descriptor = build_descriptor(&name, raw);
                (name, Arc::new(descriptor))
            })
            .collect();

        Ok(Self {
            settings: file.settings,
            projects,
        })
    }

    /// Projects with `enabled = true`, valid or not
    pub fn enabled(&self) -> impl Iterator<Item = &Arc<ProjectDescriptor>> {
        self.projects.values().filter(|p| p.enabled)
    }

    /// Number of projects that failed validation
    pub fn invalid_count(&self) -> usize {
        self.projects
            .values()
            .filter(|p| !p.status.is_valid())
            .count()
    }

    /// Copy holding only enabled projects
    pub fn only_enabled(&self) -> Config {
        Config {
            settings: self.settings.clone(),
            projects: self
                .projects
                .iter()
                .filter(|(_, p)| p.enabled)
                .map(|(name, p)| (name.clone(), Arc::clone(p)))
                .collect(),
        }
    }
}

/// Resolve the config file path (`$ISOSCELES_CONFIG` or `~/.isosceles.toml`)
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

/// Load configuration from the default location
pub fn load() -> Result<Config, ConfigError> {
    let path = config_file_path()?;
    load_from(&path)
}

/// Load configuration from an explicit path
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = Config::parse(&text, path)?;

    for project in config.projects.values() {
        match &project.status {
            ProjectStatus::Valid => info!(
                project = %project.name,
                local = %project.local_folder,
                remote = %project.remote_folder,
                "Project config looks good"
            ),
            ProjectStatus::Invalid(reason) => warn!(
                project = %project.name,
                reason = %reason,
                "Project config looks bad"
            ),
        }
    }

    info!(
        "Loaded {} project(s), with {} error(s)",
        config.projects.len(),
        config.invalid_count()
    );

    Ok(config)
}

fn build_descriptor(name: &str, raw: ProjectConfig) -> ProjectDescriptor {
    let local_folder = with_trailing_separator(&expand_home(&raw.local_folder));
    let remote_folder = with_trailing_separator(&raw.remote_folder);
    let status = validate(&raw, &local_folder);

    ProjectDescriptor {
        name: name.to_string(),
        enabled: raw.enabled,
        host: raw.host,
        local_folder,
        remote_folder,
        url: raw.url.filter(|u| !u.is_empty()),
        cooldown: Duration::from_secs(raw.cooldown),
        watch_pattern: raw.watch_pattern,
        rsync_args: raw.rsync_args,
        initial_sync: raw.initial_sync,
        open_browser: raw.open_browser,
        notify: NotifyPrefs {
            desktop: raw.desktop_notify,
            sound: raw.desktop_notify_sound,
        },
        status,
    }
}

fn validate(raw: &ProjectConfig, local_folder: &str) -> ProjectStatus {
    if raw.local_folder.is_empty() {
        return ProjectStatus::Invalid("local_folder is not set".to_string());
    }

    match std::fs::metadata(local_folder) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return ProjectStatus::Invalid(format!(
                "local folder is not a directory: {}",
                local_folder
            ))
        }
        Err(e) => {
            return ProjectStatus::Invalid(format!(
                "local folder looks bad: {} ({})",
                local_folder, e
            ))
        }
    }

    if raw.host.is_empty() {
        return ProjectStatus::Invalid("host is not set".to_string());
    }

    if raw.remote_folder.is_empty() {
        return ProjectStatus::Invalid("remote_folder is not set".to_string());
    }

    if let Err(e) = Regex::new(&raw.watch_pattern) {
        return ProjectStatus::Invalid(format!("bad watch_pattern: {}", e));
    }

    if raw.cooldown > MAX_COOLDOWN_SECS {
        return ProjectStatus::Invalid(format!(
            "cooldown out of range: {}s (max {}s)",
            raw.cooldown, MAX_COOLDOWN_SECS
        ));
    }

    ProjectStatus::Valid
}

/// Expand a leading `~/` to the home directory
fn expand_home(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    raw.to_string()
}

/// rsync copies the directory contents only when the source ends with `/`
fn with_trailing_separator(raw: &str) -> String {
    if raw.is_empty() || raw.ends_with(MAIN_SEPARATOR) {
        raw.to_string()
    } else {
        format!("{}{}", raw, MAIN_SEPARATOR)
    }
}
