//! Outcome notifications
//!
//! The [`Notifier`] trait is the seam between the platform-independent
//! scheduler and whatever the desktop offers. Delivery is fire-and-forget:
//! implementations must not wait for the user or retry.

use crate::error::NotifyError;
use crate::event::SyncOutcome;
use crate::project::ProjectDescriptor;
use tracing::info;

pub const SUCCESS_SUBTITLE: &str = "File Sync Complete";
pub const FAILURE_SUBTITLE: &str = "File Sync Failure!";
pub const CONFIG_LOADED_TITLE: &str = "isosceles - configs loaded";

/// Sound played alongside a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Success,
    Failure,
}

impl Sound {
    /// macOS system sound name
    pub fn system_name(self) -> &'static str {
        match self {
            Sound::Success => "Bottle",
            Sound::Failure => "Sosumi",
        }
    }
}

/// A desktop notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub subtitle: String,
    pub message: String,
    pub link: Option<String>,
    pub sound: Option<Sound>,
    /// Freedesktop icon name
    pub icon: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            message: message.into(),
            link: None,
            sound: None,
            icon: None,
        }
    }

    /// Summary pushed once the configuration has been loaded
    pub fn config_loaded(projects: usize, errors: usize) -> Self {
        let mut notification = Self::new(
            CONFIG_LOADED_TITLE,
            format!("Loaded {} configs, with {} error(s)", projects, errors),
        );
        notification.sound = Some(Sound::Success);
        notification.icon = Some(if errors == 0 { "dialog-information" } else { "dialog-warning" }.to_string());
        notification
    }

    /// Build the notification reporting a finished batch
    pub fn for_outcome(project: &ProjectDescriptor, outcome: &SyncOutcome) -> Self {
        let message = if outcome.triggers == 1 {
            format!("Trigger: {}", outcome.summary)
        } else {
            format!("Completed Sync of [{}] trigger(s).", outcome.triggers)
        };

        let (subtitle, sound, icon, link) = if outcome.success {
            (
                SUCCESS_SUBTITLE,
                Sound::Success,
                "dialog-information",
                project.url.clone(),
            )
        } else {
            (FAILURE_SUBTITLE, Sound::Failure, "dialog-error", None)
        };

        Self {
            title: project.name.clone(),
            subtitle: subtitle.to_string(),
            message,
            link,
            sound: project.notify.sound.then_some(sound),
            icon: Some(icon.to_string()),
        }
    }
}

/// Delivers notifications to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier that only writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            title = %notification.title,
            subtitle = %notification.subtitle,
            "{}",
            notification.message
        );
        Ok(())
    }
}

/// Desktop notifications through `osascript` (macOS) or `notify-send`
///
/// The helper process is spawned and not waited on; tokio reaps it.
/// Must be called from within a tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let (program, args) = desktop_command(notification);

        tokio::process::Command::new(program)
            .args(&args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|source| NotifyError::Spawn { program, source })
    }
}

#[cfg(target_os = "macos")]
fn desktop_command(n: &Notification) -> (&'static str, Vec<String>) {
    // Clickable links and custom icons need a helper app; osascript has neither.
    let mut script = format!(
        "display notification \"{}\" with title \"{}\"",
        applescript_escape(&n.message),
        applescript_escape(&n.title)
    );
    if !n.subtitle.is_empty() {
        script.push_str(&format!(" subtitle \"{}\"", applescript_escape(&n.subtitle)));
    }
    if let Some(sound) = n.sound {
        script.push_str(&format!(" sound name \"{}\"", sound.system_name()));
    }
    ("osascript", vec!["-e".to_string(), script])
}

#[cfg(not(target_os = "macos"))]
fn desktop_command(n: &Notification) -> (&'static str, Vec<String>) {
    let mut args = vec!["--app-name=isosceles".to_string()];
    if let Some(icon) = &n.icon {
        args.push(format!("--icon={}", icon));
    }
    args.push(n.title.clone());

    let mut body = n.subtitle.clone();
    if !n.message.is_empty() {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(&n.message);
    }
    if let Some(link) = &n.link {
        body.push('\n');
        body.push_str(link);
    }
    args.push(body);

    ("notify-send", args)
}

#[cfg(target_os = "macos")]
fn applescript_escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
