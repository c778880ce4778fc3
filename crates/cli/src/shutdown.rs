//! Waiting for the operator to end an active sync

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Line that ends an active sync
pub const QUIT: &str = "q";

/// What ended the wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitReason {
    /// `q` + return on stdin
    Quit,
    /// Ctrl-C
    Interrupt,
    /// Neither stdin nor Ctrl-C can be observed any more
    Closed,
}

/// Block until `q` is read from stdin or Ctrl-C is pressed
pub async fn wait_for_quit() -> QuitReason {
    wait_for_quit_from(BufReader::new(tokio::io::stdin())).await
}

/// Like [`wait_for_quit`] but reading quit lines from `input`
///
/// End of input only disables that source; Ctrl-C keeps working.
pub async fn wait_for_quit_from<R>(input: R) -> QuitReason
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;
    let mut signals_ok = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) if is_quit(&line) => return QuitReason::Quit,
                Ok(Some(line)) => debug!("Ignoring input: {:?}", line),
                Ok(None) => {
                    debug!("stdin closed, waiting for Ctrl-C");
                    input_open = false;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    input_open = false;
                }
            },
            res = tokio::signal::ctrl_c(), if signals_ok => match res {
                Ok(()) => return QuitReason::Interrupt,
                Err(e) => {
                    warn!("Cannot listen for Ctrl-C: {}", e);
                    signals_ok = false;
                }
            },
            else => return QuitReason::Closed,
        }
    }
}

fn is_quit(line: &str) -> bool {
    line.trim() == QUIT
}
