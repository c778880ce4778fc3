//! Per-project worker setup and lifetime
//!
//! One scheduler task per enabled, valid project. Projects never share
//! mutable state; a project that cannot be set up is skipped and reported
//! without affecting the others.

use iso_core::{
    BrowserLauncher, ChangeEvent, Config, DesktopNotifier, Notification, Notifier,
    ProjectDescriptor, Settings, SyncOutcome, SystemBrowser,
};
use scheduler::{RsyncExecutor, Scheduler, SyncExecutor};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use watcher::{FsWatchSource, WatchError, WatchSource, WatchSpec};

/// Why a configured project has no worker
#[derive(Debug)]
pub enum SkipReason {
    Disabled,
    Invalid(String),
    Watch(WatchError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "disabled"),
            SkipReason::Invalid(reason) => write!(f, "invalid: {}", reason),
            SkipReason::Watch(e) => write!(f, "watch failed: {}", e),
        }
    }
}

/// A project left out of the active sync
#[derive(Debug)]
pub struct Skipped {
    pub project: String,
    pub reason: SkipReason,
}

/// Workers started by [`Orchestrator::start`]
pub struct Running {
    pub workers: Vec<(String, JoinHandle<()>)>,
    pub skipped: Vec<Skipped>,
    shutdown: CancellationToken,
}

impl Running {
    pub fn project_names(&self) -> Vec<&str> {
        self.workers.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Stop every scheduler and wait for their loops to exit
    ///
    /// Transfers already in flight are not waited for.
    pub async fn shutdown(self) {
        self.shutdown.cancel();

        for (name, handle) in self.workers {
            if let Err(e) = handle.await {
                warn!(project = %name, "Worker ended abnormally: {}", e);
            }
        }
    }
}

/// Wires watch sources, schedulers and executors together
pub struct Orchestrator {
    watch: Arc<dyn WatchSource>,
    executor: Arc<dyn SyncExecutor>,
    notifier: Arc<dyn Notifier>,
    browser: Arc<dyn BrowserLauncher>,
    outcomes: Option<mpsc::UnboundedSender<SyncOutcome>>,
}

impl Orchestrator {
    pub fn new(
        watch: Arc<dyn WatchSource>,
        executor: Arc<dyn SyncExecutor>,
        notifier: Arc<dyn Notifier>,
        browser: Arc<dyn BrowserLauncher>,
    ) -> Self {
        Self {
            watch,
            executor,
            notifier,
            browser,
            outcomes: None,
        }
    }

    /// Production wiring: notify watcher, rsync, desktop notifications
    pub fn system(settings: &Settings) -> Self {
        Self::new(
            Arc::new(FsWatchSource),
            Arc::new(RsyncExecutor::new(settings.rsync_path.clone())),
            Arc::new(DesktopNotifier),
            Arc::new(SystemBrowser),
        )
    }

    /// Forward every batch outcome of every project to `tx`
    pub fn with_outcome_sink(mut self, tx: mpsc::UnboundedSender<SyncOutcome>) -> Self {
        self.outcomes = Some(tx);
        self
    }

    /// Push a one-off notification; failures are logged only
    pub fn announce(&self, notification: &Notification) {
        if let Err(e) = self.notifier.notify(notification) {
            warn!("Error with desktop notification: {}", e);
        }
    }

    /// Start one worker per runnable project
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, config: &Config, shutdown: CancellationToken) -> Running {
        let mut workers = Vec::new();
        let mut skipped = Vec::new();
        let min_interval = config.settings.min_interval();

        for (name, project) in &config.projects {
            if !project.enabled {
                info!("Skipping Project: [{}], since its disabled...", name);
                skipped.push(Skipped {
                    project: name.clone(),
                    reason: SkipReason::Disabled,
                });
                continue;
            }

            if let iso_core::ProjectStatus::Invalid(reason) = &project.status {
                warn!("Skipping Project: [{}], config is invalid: {}", name, reason);
                skipped.push(Skipped {
                    project: name.clone(),
                    reason: SkipReason::Invalid(reason.clone()),
                });
                continue;
            }

            match self.start_project(project, min_interval, shutdown.child_token()) {
                Ok(handle) => workers.push((name.clone(), handle)),
                Err(e) => {
                    warn!("Skipping Project: [{}], could not watch: {}", name, e);
                    skipped.push(Skipped {
                        project: name.clone(),
                        reason: SkipReason::Watch(e),
                    });
                }
            }
        }

        info!(
            "Active sync running for {} project(s), {} skipped",
            workers.len(),
            skipped.len()
        );

        Running {
            workers,
            skipped,
            shutdown,
        }
    }

    fn start_project(
        &self,
        project: &Arc<ProjectDescriptor>,
        min_interval: Duration,
        shutdown: CancellationToken,
    ) -> Result<JoinHandle<()>, WatchError> {
        info!("Setting up Project: [{}]", project.name);
        debug!("  Recursively Watching Folder: [{}]...", project.local_folder);
        debug!("  Syncing to Remote Folder: [{}]...", project.remote_folder);
        debug!("  On Remote Host: [{}]...", project.host);
        debug!("  With Cooldown Period: [{}] second(s).", project.cooldown.as_secs_f64());

        let subscription = self.watch.subscribe(&WatchSpec::for_project(project))?;
        let (events, guard) = subscription.into_parts();

        if project.open_browser {
            if let Some(url) = &project.url {
                debug!("  Opening Browser...");
                if let Err(e) = self.browser.open(url) {
                    warn!(project = %project.name, "Failed to open browser: {}", e);
                }
            }
        }

        let mut scheduler = Scheduler::new(
            Arc::clone(project),
            min_interval,
            events,
            Arc::clone(&self.executor),
            Arc::clone(&self.notifier),
        );
        if let Some(tx) = &self.outcomes {
            scheduler = scheduler.with_outcome_sink(tx.clone());
        }

        if project.initial_sync {
            debug!("  Running Initial Sync...");
            scheduler.seed(ChangeEvent::initial_sync(Arc::from(project.name.as_str())));
        }

        Ok(tokio::spawn(async move {
            // The OS watch lives exactly as long as the scheduler loop
            let _guard = guard;
            scheduler.run(shutdown).await;
        }))
    }
}
