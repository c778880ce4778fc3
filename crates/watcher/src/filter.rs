//! Path filtering for watched projects
//!
//! A raw filesystem path is accepted when:
//! 1. It lies under the project root (the root itself is not a change)
//! 2. No component of its root-relative path is hidden (starts with `.`),
//!    when hidden entries are excluded
//! 3. The root-relative path matches the project's watch pattern

use crate::WatchError;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

/// Decides which filesystem paths count as project changes
#[derive(Debug, Clone)]
pub struct WatchFilter {
    /// Root as configured
    root: PathBuf,

    /// Canonical root; some backends (FSEvents) report resolved paths
    canonical_root: Option<PathBuf>,

    /// Pattern matched against the root-relative path
    pattern: Regex,

    exclude_hidden: bool,
}

impl WatchFilter {
    pub fn new(root: &Path, pattern: &str, exclude_hidden: bool) -> Result<Self, WatchError> {
        let canonical_root = std::fs::canonicalize(root)
            .ok()
            .filter(|canonical| canonical != root);

        Ok(Self {
            root: root.to_path_buf(),
            canonical_root,
            pattern: Regex::new(pattern)?,
            exclude_hidden,
        })
    }

    /// Root-relative path for an accepted change, `None` if filtered out
    pub fn accept(&self, path: &Path) -> Option<PathBuf> {
        let relative = self.relative(path)?;

        if self.exclude_hidden && is_hidden(&relative) {
            return None;
        }

        if !self.pattern.is_match(&relative.to_string_lossy()) {
            return None;
        }

        Some(relative)
    }

    /// Strip the project root from `path`
    fn relative(&self, path: &Path) -> Option<PathBuf> {
        let stripped = path.strip_prefix(&self.root).ok().or_else(|| {
            self.canonical_root
                .as_ref()
                .and_then(|canonical| path.strip_prefix(canonical).ok())
        })?;

        if stripped.as_os_str().is_empty() {
            None
        } else {
            Some(stripped.to_path_buf())
        }
    }
}

/// Any component of the relative path starts with a dot
pub fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}
