//! Per-project batch state
//!
//! Pure data structure with no I/O; every method takes `now` explicitly.
//! The scheduler loop is its only owner, which serializes event arrival,
//! deadline expiry and run completion through one decision point.

use iso_core::{BatchSnapshot, ChangeEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use ulid::Ulid;

/// Stand-in for a deadline too far out to represent
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Scheduler phase, derived from the batch state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing pending, nothing running
    Idle,
    /// Triggers pending, waiting for the fire instant
    Armed,
    /// A run is in flight (triggers may be pending for the next batch)
    Firing,
}

/// Timing knobs for one project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Quiet period after the most recent change
    pub cooldown: Duration,
    /// Minimum spacing between the end of a run and the next fire
    pub min_interval: Duration,
}

#[derive(Debug, Clone)]
struct PendingBatch {
    triggers: usize,
    deadline: Instant,
    last_change: String,
}

/// Batch state for one project
#[derive(Debug)]
pub struct BatchState {
    project: Arc<str>,
    timing: Timing,
    pending: Option<PendingBatch>,
    in_flight: bool,
    last_completed: Option<Instant>,
}

impl BatchState {
    pub fn new(project: Arc<str>, timing: Timing) -> Self {
        Self {
            project,
            timing,
            pending: None,
            in_flight: false,
            last_completed: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight {
            Phase::Firing
        } else if self.pending.is_some() {
            Phase::Armed
        } else {
            Phase::Idle
        }
    }

    /// Triggers accumulated for the next batch
    pub fn pending_triggers(&self) -> usize {
        self.pending.as_ref().map_or(0, |p| p.triggers)
    }

    /// Count a change event, arming or sliding the deadline
    ///
    /// Events recorded while a run is in flight start the next batch.
    pub fn record(&mut self, event: &ChangeEvent) {
        let deadline = later(event.at, self.timing.cooldown);
        let last_change = event.describe();

        match &mut self.pending {
            Some(pending) => {
                pending.triggers += 1;
                // Arrival stamps may be slightly out of order; never pull the deadline in
                pending.deadline = pending.deadline.max(deadline);
                pending.last_change = last_change;
            }
            None => {
                self.pending = Some(PendingBatch {
                    triggers: 1,
                    deadline,
                    last_change,
                });
            }
        }
    }

    /// Instant at which the pending batch may fire
    ///
    /// `None` while idle or while a run is in flight.
    pub fn fire_at(&self) -> Option<Instant> {
        if self.in_flight {
            return None;
        }

        let pending = self.pending.as_ref()?;
        let earliest = self
            .last_completed
            .map(|done| later(done, self.timing.min_interval));

        Some(match earliest {
            Some(earliest) => pending.deadline.max(earliest),
            None => pending.deadline,
        })
    }

    /// Take the pending batch if it is due, marking a run in flight
    pub fn take_due(&mut self, now: Instant) -> Option<BatchSnapshot> {
        let fire_at = self.fire_at()?;
        if now < fire_at {
            return None;
        }

        let pending = self.pending.take()?;
        self.in_flight = true;

        Some(BatchSnapshot {
            id: Ulid::new(),
            project: Arc::clone(&self.project),
            triggers: pending.triggers,
            last_change: pending.last_change,
        })
    }

    /// Record the end of the in-flight run, successful or not
    pub fn complete(&mut self, now: Instant) {
        self.in_flight = false;
        self.last_completed = Some(now);
    }

    pub fn last_completed(&self) -> Option<Instant> {
        self.last_completed
    }
}

/// `at + delay`, saturating to a far-future instant instead of overflowing
fn later(at: Instant, delay: Duration) -> Instant {
    at.checked_add(delay)
        .or_else(|| at.checked_add(FAR_FUTURE))
        .unwrap_or(at)
}
