//! Sync execution
//!
//! Runs the external transfer command for a fired batch. Only the exit
//! status matters; output goes straight to the terminal.

use async_trait::async_trait;
use iso_core::{BatchSnapshot, ProjectDescriptor, SyncOutcome};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Executes one batch for a project
#[async_trait]
pub trait SyncExecutor: Send + Sync {
    async fn execute(&self, project: &ProjectDescriptor, batch: &BatchSnapshot) -> SyncOutcome;
}

/// Runs `rsync [args…] <local_folder> <host>:<remote_folder>`
///
/// No timeout: a hung transfer holds only its own project's batch.
#[derive(Debug, Clone)]
pub struct RsyncExecutor {
    program: String,
}

impl RsyncExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for RsyncExecutor {
    fn default() -> Self {
        Self::new("rsync")
    }
}

#[async_trait]
impl SyncExecutor for RsyncExecutor {
    async fn execute(&self, project: &ProjectDescriptor, batch: &BatchSnapshot) -> SyncOutcome {
        let args = project.transfer_args();

        info!(project = %project.name, batch = %batch.id, "Starting {}...", self.program);
        debug!(project = %project.name, "cmd: {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await;

        let success = match status {
            Ok(status) if status.success() => true,
            Ok(status) => {
                warn!(project = %project.name, batch = %batch.id, "{} exited with {}", self.program, status);
                false
            }
            Err(e) => {
                warn!(project = %project.name, batch = %batch.id, "Failed to run {}: {}", self.program, e);
                false
            }
        };

        SyncOutcome::from_batch(batch, success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iso_core::{NotifyPrefs, ProjectStatus};
    use std::sync::Arc;
    use std::time::Duration;
    use ulid::Ulid;

    fn project() -> ProjectDescriptor {
        ProjectDescriptor {
            name: "site".to_string(),
            enabled: true,
            host: "localhost".to_string(),
            local_folder: "/tmp/".to_string(),
            remote_folder: "/tmp/".to_string(),
            url: None,
            cooldown: Duration::from_secs(1),
            watch_pattern: ".*".to_string(),
            rsync_args: vec!["-n".to_string()],
            initial_sync: false,
            open_browser: false,
            notify: NotifyPrefs::default(),
            status: ProjectStatus::Valid,
        }
    }

    fn batch(triggers: usize) -> BatchSnapshot {
        BatchSnapshot {
            id: Ulid::new(),
            project: Arc::from("site"),
            triggers,
            last_change: "index.html".to_string(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let outcome = RsyncExecutor::new("true").execute(&project(), &batch(2)).await;

        assert!(outcome.success);
        assert_eq!(outcome.triggers, 2);
        assert_eq!(outcome.summary, "2 triggers");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let outcome = RsyncExecutor::new("false").execute(&project(), &batch(1)).await;

        assert!(!outcome.success);
        assert_eq!(outcome.summary, "index.html");
    }

    #[tokio::test]
    async fn test_spawn_failure_is_failure() {
        let executor = RsyncExecutor::new("/nonexistent/isosceles-transfer");
        let outcome = executor.execute(&project(), &batch(1)).await;

        assert!(!outcome.success);
    }
}
