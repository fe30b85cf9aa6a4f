//! Exec error types.

use std::time::Duration;

/// Errors returned by command runners.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// IO error while spawning or reading the child.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The program could not be found on PATH.
    #[error("command not found: {0}")]
    NotFound(String),
    /// The child did not exit within its bound and was killed.
    #[error("command timed out after {}s: {command}", after.as_secs())]
    TimedOut { command: String, after: Duration },
    /// The program name is empty or the command line could not be parsed.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}
