//! Command execution types.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Command specification for a single process run.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    /// Program name or path.
    pub command: PathBuf,
    /// Command arguments.
    pub args: Vec<String>,
    /// Optional working directory.
    pub cwd: Option<PathBuf>,
    /// Extra environment variables layered over the inherited environment.
    pub env: BTreeMap<String, String>,
    /// Upper bound on wait time. `None` waits for exit.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    /// Create a new command spec with defaults.
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Bound the run.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Program and arguments joined for logs and messages.
    pub fn display(&self) -> String {
        let mut parts = vec![self.command.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Result of a finished command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandResult {
    /// Exit status code if available.
    pub status_code: Option<i32>,
    /// Captured stdout content.
    pub stdout: String,
    /// Captured stderr content.
    pub stderr: String,
}

impl CommandResult {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandResult, CommandSpec};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn command_spec_defaults_are_empty() {
        let spec = CommandSpec::new("echo");
        assert_eq!(spec.command, PathBuf::from("echo"));
        assert_eq!(spec.args.len(), 0);
        assert_eq!(spec.cwd, None);
        assert_eq!(spec.env.len(), 0);
        assert_eq!(spec.timeout, None);
    }

    #[test]
    fn command_spec_builder_collects_fields() {
        let spec = CommandSpec::new("xdotool")
            .args(["mousemove", "10", "20"])
            .env("DISPLAY", ":0")
            .timeout(Duration::from_secs(3));
        assert_eq!(spec.display(), "xdotool mousemove 10 20");
        assert_eq!(spec.env["DISPLAY"], ":0");
        assert_eq!(spec.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn success_requires_zero_status() {
        let ok = CommandResult {
            status_code: Some(0),
            ..CommandResult::default()
        };
        let killed = CommandResult::default();
        assert!(ok.success());
        assert!(!killed.success());
    }
}
