//! File system watching for isosceles
//!
//! This crate provides the watch source feeding project schedulers:
//! - [`WatchSource`] seam (`subscribe` a project root, get a stream of changes)
//! - [`FsWatchSource`], backed by `notify` (FSEvents / inotify)
//! - Pattern and hidden-entry filtering ([`WatchFilter`])

pub mod filter;

pub use filter::WatchFilter;

use iso_core::{ChangeEvent, ProjectDescriptor};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Watch source errors
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watch root is not a directory: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("invalid watch pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to watch: {0}")]
    Notify(#[from] notify::Error),
}

/// What to watch for one project
#[derive(Debug, Clone)]
pub struct WatchSpec {
    pub project: Arc<str>,
    pub root: PathBuf,
    pub pattern: String,
    pub recursive: bool,
    pub exclude_hidden: bool,
}

impl WatchSpec {
    /// Recursive watch of the project's local root, hidden entries excluded
    pub fn for_project(project: &ProjectDescriptor) -> Self {
        Self {
            project: Arc::from(project.name.as_str()),
            root: project.local_root().to_path_buf(),
            pattern: project.watch_pattern.clone(),
            recursive: true,
            exclude_hidden: true,
        }
    }
}

/// Keeps the underlying OS watch alive; dropping it ends the event stream
pub struct WatchGuard {
    _watcher: Option<RecommendedWatcher>,
}

/// An active subscription: the event stream plus its guard
pub struct Subscription {
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    guard: WatchGuard,
}

impl Subscription {
    /// Subscription fed by an arbitrary channel (no OS watch behind it)
    pub fn from_receiver(events: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self {
            events,
            guard: WatchGuard { _watcher: None },
        }
    }

    pub fn into_parts(self) -> (mpsc::UnboundedReceiver<ChangeEvent>, WatchGuard) {
        (self.events, self.guard)
    }
}

/// Source of change events for a project root
pub trait WatchSource: Send + Sync {
    fn subscribe(&self, spec: &WatchSpec) -> Result<Subscription, WatchError>;
}

/// `notify`-backed watch source
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWatchSource;

impl WatchSource for FsWatchSource {
    fn subscribe(&self, spec: &WatchSpec) -> Result<Subscription, WatchError> {
        if !spec.root.is_dir() {
            return Err(WatchError::MissingRoot(spec.root.clone()));
        }

        let filter = WatchFilter::new(&spec.root, &spec.pattern, spec.exclude_hidden)?;
        let project = Arc::clone(&spec.project);

        // notify calls back on its own thread; the unbounded send never blocks it
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if !is_change(&event.kind) {
                        return;
                    }
                    for path in event.paths {
                        match filter.accept(&path) {
                            Some(relative) => {
                                debug!(project = %project, path = %relative.display(), "File modified");
                                // Receiver gone means the project is shutting down
                                let _ = tx.send(ChangeEvent::watched(Arc::clone(&project), relative));
                            }
                            None => debug!(project = %project, path = %path.display(), "Filtered"),
                        }
                    }
                }
                Err(e) => warn!(project = %project, "Watch error: {}", e),
            }
        })?;

        let mode = if spec.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&spec.root, mode)?;

        Ok(Subscription {
            events: rx,
            guard: WatchGuard {
                _watcher: Some(watcher),
            },
        })
    }
}

/// Content or structure changes; access notifications are not changes
fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
