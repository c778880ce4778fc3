//! Shared types for isosceles
//!
//! This crate provides:
//! - Project descriptors and configuration loading
//! - Change events, batch snapshots and sync outcomes
//! - Notification and browser-launch ports

pub mod browser;
pub mod config;
pub mod error;
pub mod event;
pub mod notify;
pub mod project;

// Re-exports
pub use browser::{BrowserLauncher, SystemBrowser};
pub use config::{Config, Settings};
pub use error::{ConfigError, NotifyError};
pub use event::{BatchSnapshot, ChangeEvent, ChangeOrigin, SyncOutcome};
pub use notify::{DesktopNotifier, LogNotifier, Notification, Notifier};
pub use project::{NotifyPrefs, ProjectDescriptor, ProjectStatus};
