//! The per-project decision loop
//!
//! ```text
//! watch events ──→ ┐
//! run finished ──→ ├─ select! ──→ BatchState ──→ (due) spawn SyncExecutor
//! fire instant ──→ │
//! shutdown     ──→ ┘
//! ```
//!
//! One task owns the [`BatchState`]; every wake-up reason is handled in
//! turn by the same loop. The transfer itself runs in a spawned task and
//! reports back over a channel, so the loop keeps accepting events while a
//! batch is firing without ever starting a second run for the project.

use crate::batch::{BatchState, Phase, Timing};
use crate::executor::SyncExecutor;
use iso_core::{BatchSnapshot, ChangeEvent, Notification, Notifier, ProjectDescriptor, SyncOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Coalesces change events for one project into sync runs
pub struct Scheduler {
    project: Arc<ProjectDescriptor>,
    state: BatchState,
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    executor: Arc<dyn SyncExecutor>,
    notifier: Arc<dyn Notifier>,
    /// Optional observer of every finished batch
    outcomes: Option<mpsc::UnboundedSender<SyncOutcome>>,
}

impl Scheduler {
    pub fn new(
        project: Arc<ProjectDescriptor>,
        min_interval: Duration,
        events: mpsc::UnboundedReceiver<ChangeEvent>,
        executor: Arc<dyn SyncExecutor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let timing = Timing {
            cooldown: project.cooldown,
            min_interval,
        };
        let state = BatchState::new(Arc::from(project.name.as_str()), timing);

        Self {
            project,
            state,
            events,
            executor,
            notifier,
            outcomes: None,
        }
    }

    /// Forward a copy of every outcome to `tx`
    pub fn with_outcome_sink(mut self, tx: mpsc::UnboundedSender<SyncOutcome>) -> Self {
        self.outcomes = Some(tx);
        self
    }

    /// Record an event before the loop starts (initial sync)
    pub fn seed(&mut self, event: ChangeEvent) {
        self.accept(event);
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Run until shutdown, or until the event stream ends with nothing
    /// left pending or in flight
    ///
    /// A run still in flight at shutdown is left to finish on its own.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let (done_tx, mut done_rx) = mpsc::channel::<SyncOutcome>(1);
        let mut events_open = true;

        info!(
            project = %self.project.name,
            cooldown_secs = self.project.cooldown.as_secs_f64(),
            "Scheduler started"
        );

        loop {
            let fire_at = self.state.fire_at();

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!(project = %self.project.name, phase = ?self.state.phase(), "Scheduler stopping");
                    break;
                }

                Some(outcome) = done_rx.recv() => {
                    self.finish(outcome);
                }

                event = self.events.recv(), if events_open => match event {
                    Some(event) => self.accept(event),
                    None => {
                        debug!(project = %self.project.name, "Event stream closed");
                        events_open = false;
                    }
                },

                _ = sleep_until(fire_at.unwrap_or_else(Instant::now)), if fire_at.is_some() => {
                    if let Some(batch) = self.state.take_due(Instant::now()) {
                        self.launch(batch, done_tx.clone());
                    }
                }
            }

            if !events_open && self.state.phase() == Phase::Idle {
                info!(project = %self.project.name, "Scheduler finished");
                break;
            }
        }
    }

    fn accept(&mut self, event: ChangeEvent) {
        self.state.record(&event);
        debug!(
            project = %self.project.name,
            path = %event.describe(),
            pending = self.state.pending_triggers(),
            "Trigger"
        );
    }

    fn launch(&self, batch: BatchSnapshot, done: mpsc::Sender<SyncOutcome>) {
        info!(
            project = %self.project.name,
            batch = %batch.id,
            triggers = batch.triggers,
            "Firing batch"
        );

        let executor = Arc::clone(&self.executor);
        let project = Arc::clone(&self.project);

        tokio::spawn(async move {
            let fallback = batch.clone();
            let run = tokio::spawn(async move { executor.execute(&project, &batch).await });

            let outcome = match run.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(batch = %fallback.id, "Sync task failed: {}", e);
                    SyncOutcome::from_batch(&fallback, false)
                }
            };

            // Loop gone means shutdown; nobody is waiting for the result
            let _ = done.send(outcome).await;
        });
    }

    fn finish(&mut self, outcome: SyncOutcome) {
        self.state.complete(Instant::now());

        if outcome.success {
            info!(batch = %outcome.batch, "{}", outcome);
        } else {
            warn!(batch = %outcome.batch, "{}", outcome);
        }

        if self.project.notify.desktop {
            let notification = Notification::for_outcome(&self.project, &outcome);
            if let Err(e) = self.notifier.notify(&notification) {
                warn!(project = %self.project.name, "Error with desktop notification: {}", e);
            }
        }

        if let Some(tx) = &self.outcomes {
            let _ = tx.send(outcome);
        }
    }
}
