//! Change events, batch snapshots and sync outcomes

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Instant;
use ulid::Ulid;

/// Description used for the synthetic startup event
pub const INITIAL_SYNC: &str = "Initial Sync";

/// Where a change event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Reported by the filesystem watch source
    Watch,
    /// Synthesized at startup for projects with `initial_sync = true`
    InitialSync,
}

/// A single detected change for one project
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// Name of the owning project
    pub project: Arc<str>,
    /// Changed path, relative to the project's local root
    pub path: PathBuf,
    /// Arrival time
    pub at: Instant,
    pub origin: ChangeOrigin,
}

impl ChangeEvent {
    /// Event reported by the watch source, stamped now
    pub fn watched(project: Arc<str>, path: impl Into<PathBuf>) -> Self {
        Self {
            project,
            path: path.into(),
            at: Instant::now(),
            origin: ChangeOrigin::Watch,
        }
    }

    /// Synthetic startup event
    pub fn initial_sync(project: Arc<str>) -> Self {
        Self {
            project,
            path: PathBuf::new(),
            at: Instant::now(),
            origin: ChangeOrigin::InitialSync,
        }
    }

    /// Human-readable description of what changed
    pub fn describe(&self) -> String {
        match self.origin {
            ChangeOrigin::Watch => self.path.display().to_string(),
            ChangeOrigin::InitialSync => INITIAL_SYNC.to_string(),
        }
    }
}

/// Frozen view of a batch at the moment it fires
#[derive(Debug, Clone)]
pub struct BatchSnapshot {
    pub id: Ulid,
    pub project: Arc<str>,
    /// Number of change events covered by this run
    pub triggers: usize,
    /// Description of the most recent change in the batch
    pub last_change: String,
}

impl BatchSnapshot {
    /// The changed path when the batch holds a single trigger,
    /// otherwise an aggregate "N triggers"
    pub fn summary(&self) -> String {
        if self.triggers == 1 {
            self.last_change.clone()
        } else {
            format!("{} triggers", self.triggers)
        }
    }
}

/// Result of one fired batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub batch: Ulid,
    pub project: Arc<str>,
    /// Transfer command exited with status zero
    pub success: bool,
    pub triggers: usize,
    /// See [`BatchSnapshot::summary`]
    pub summary: String,
}

impl SyncOutcome {
    pub fn from_batch(batch: &BatchSnapshot, success: bool) -> Self {
        Self {
            batch: batch.id,
            project: Arc::clone(&batch.project),
            success,
            triggers: batch.triggers,
            summary: batch.summary(),
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.success { "Completed" } else { "Failed" };
        write!(
            f,
            "[{}] {} Sync of [{}] trigger(s).",
            self.project, verb, self.triggers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(triggers: usize, last_change: &str) -> BatchSnapshot {
        BatchSnapshot {
            id: Ulid::new(),
            project: Arc::from("site"),
            triggers,
            last_change: last_change.to_string(),
        }
    }

    #[test]
    fn test_summary_single_trigger_is_path() {
        assert_eq!(snapshot(1, "src/main.rs").summary(), "src/main.rs");
    }

    #[test]
    fn test_summary_many_triggers_is_aggregate() {
        assert_eq!(snapshot(4, "src/main.rs").summary(), "4 triggers");
    }

    #[tokio::test]
    async fn test_initial_sync_description() {
        let event = ChangeEvent::initial_sync(Arc::from("site"));
        assert_eq!(event.describe(), INITIAL_SYNC);

        let event = ChangeEvent::watched(Arc::from("site"), "css/app.css");
        assert_eq!(event.describe(), "css/app.css");
    }

    #[test]
    fn test_outcome_display() {
        let outcome = SyncOutcome::from_batch(&snapshot(3, "a"), false);
        assert_eq!(outcome.to_string(), "[site] Failed Sync of [3] trigger(s).");
    }
}
