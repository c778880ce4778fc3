//! Project descriptors
//!
//! A descriptor is built once when the configuration is loaded and is
//! shared read-only (behind an `Arc`) by the orchestrator, the project's
//! scheduler and the sync executor.

use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Validation state of a configured project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectStatus {
    Valid,
    /// The project cannot be watched; carries the reason shown to the operator
    Invalid(String),
}

impl ProjectStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, ProjectStatus::Valid)
    }
}

/// Desktop notification preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyPrefs {
    /// Push a desktop notification after every batch
    pub desktop: bool,
    /// Play a sound with the notification
    pub sound: bool,
}

/// Immutable configuration for one watched project
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    /// Unique project name (the config table key)
    pub name: String,
    pub enabled: bool,
    /// Remote host, used as `host:remote_folder`
    pub host: String,
    /// Local root, always ending with a path separator
    pub local_folder: String,
    /// Remote root, always ending with a path separator
    pub remote_folder: String,
    pub url: Option<String>,
    /// Quiet period measured from the most recent change
    pub cooldown: Duration,
    /// Regex matched against root-relative paths
    pub watch_pattern: String,
    /// Flags passed to the transfer command before the source/destination
    pub rsync_args: Vec<String>,
    pub initial_sync: bool,
    pub open_browser: bool,
    pub notify: NotifyPrefs,
    pub status: ProjectStatus,
}

impl ProjectDescriptor {
    /// Local root as a path
    pub fn local_root(&self) -> &Path {
        Path::new(&self.local_folder)
    }

    /// `host:remote_folder` destination specifier
    pub fn destination(&self) -> String {
        format!("{}:{}", self.host, self.remote_folder)
    }

    /// Full argument list for the transfer command
    pub fn transfer_args(&self) -> Vec<String> {
        let mut args = self.rsync_args.clone();
        args.push(self.local_folder.clone());
        args.push(self.destination());
        args
    }

    /// Enabled and valid
    pub fn is_runnable(&self) -> bool {
        self.enabled && self.status.is_valid()
    }
}

impl fmt::Display for ProjectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name)
    }
}

#[cfg(test)]
pub(crate) fn test_descriptor(name: &str, local: &str) -> ProjectDescriptor {
    ProjectDescriptor {
        name: name.to_string(),
        enabled: true,
        host: "dev.example.com".to_string(),
        local_folder: local.to_string(),
        remote_folder: "/srv/site/".to_string(),
        url: None,
        cooldown: Duration::from_secs(1),
        watch_pattern: ".*".to_string(),
        rsync_args: vec![],
        initial_sync: false,
        open_browser: false,
        notify: NotifyPrefs::default(),
        status: ProjectStatus::Valid,
    }
}
