//! Opening project URLs in the user's browser

use crate::error::NotifyError;

/// Opens a URL; failures are reported, never fatal
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> Result<(), NotifyError>;
}

/// Uses the platform opener (`open` on macOS, `xdg-open` elsewhere)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

#[cfg(target_os = "macos")]
const OPENER: &str = "open";

#[cfg(not(target_os = "macos"))]
const OPENER: &str = "xdg-open";

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), NotifyError> {
        tokio::process::Command::new(OPENER)
            .arg(url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|source| NotifyError::Spawn {
                program: OPENER,
                source,
            })
    }
}
