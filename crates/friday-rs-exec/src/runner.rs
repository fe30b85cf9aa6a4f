//! Command runner trait and the local host implementation.

use crate::error::ExecError;
use crate::types::{CommandResult, CommandSpec};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// Process execution interface used by every capability that shells out.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, capturing stdout and stderr.
    ///
    /// When `spec.timeout` elapses the child is killed and
    /// [`ExecError::TimedOut`] is returned.
    async fn run(&self, spec: CommandSpec) -> Result<CommandResult, ExecError>;

    /// Launch a command without waiting for it and return its pid.
    async fn spawn(&self, spec: CommandSpec) -> Result<u32, ExecError>;

    /// Resolve a program name on PATH.
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Runner that executes commands directly on the host.
#[derive(Debug, Default, Clone)]
pub struct LocalCommandRunner;

impl LocalCommandRunner {
    /// Create a new local runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for LocalCommandRunner {
    async fn run(&self, spec: CommandSpec) -> Result<CommandResult, ExecError> {
        ensure_program(&spec)?;
        debug!(
            "running local process (args_len={}, has_cwd={}, timeout_ms={:?})",
            spec.args.len(),
            spec.cwd.is_some(),
            spec.timeout.map(|timeout| timeout.as_millis())
        );
        let mut command = build_command(&spec);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        command.kill_on_drop(true);
        // Own process group so a timeout also reaches whatever the child started.
        command.process_group(0);

        let mut child = command.spawn().map_err(|err| spawn_error(&spec, err))?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let outcome = match spec.timeout {
            Some(limit) => {
                tokio::time::timeout(limit, collect_output(&mut child, stdout, stderr)).await
            }
            None => Ok(collect_output(&mut child, stdout, stderr).await),
        };

        let (status, stdout, stderr) = match outcome {
            Ok(result) => result?,
            Err(_) => {
                kill_process_group(&mut child).await;
                let after = spec.timeout.unwrap_or_default();
                info!(
                    "local process timed out (timeout_ms={})",
                    after.as_millis()
                );
                return Err(ExecError::TimedOut {
                    command: spec.display(),
                    after,
                });
            }
        };

        if !status.success() {
            debug!("local process exited unsuccessfully (status={:?})", status.code());
        }
        Ok(CommandResult {
            status_code: status.code(),
            stdout,
            stderr,
        })
    }

    async fn spawn(&self, spec: CommandSpec) -> Result<u32, ExecError> {
        ensure_program(&spec)?;
        let mut command = build_command(&spec);
        command.stdin(Stdio::null());
        command.stdout(Stdio::null());
        command.stderr(Stdio::null());

        let mut child = command.spawn().map_err(|err| spawn_error(&spec, err))?;
        let pid = child.id().unwrap_or_default();
        info!("launched detached process (pid={pid})");
        // Reap the child when it exits so it does not linger as a zombie.
        tokio::spawn(async move {
            let _ = child.wait().await;
        });
        Ok(pid)
    }
}

fn ensure_program(spec: &CommandSpec) -> Result<(), ExecError> {
    if spec.command.as_os_str().is_empty() {
        return Err(ExecError::InvalidCommand("empty program name".to_string()));
    }
    Ok(())
}

/// SIGKILL the child's process group, then reap the child itself.
async fn kill_process_group(child: &mut Child) {
    if let Some(pid) = child.id() {
        // The child leads its own group (process_group(0)), so pgid == pid.
        let result = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
        if result != 0 {
            warn!(
                "failed to kill process group (pgid={pid}): {}",
                std::io::Error::last_os_error()
            );
        }
    }
    if let Err(err) = child.kill().await {
        warn!("failed to kill timed out process: {err}");
    }
}

fn build_command(spec: &CommandSpec) -> Command {
    let mut command = Command::new(&spec.command);
    command.args(&spec.args);
    for (key, value) in &spec.env {
        command.env(key, value);
    }
    if let Some(cwd) = &spec.cwd {
        command.current_dir(cwd);
    }
    command
}

fn spawn_error(spec: &CommandSpec, err: std::io::Error) -> ExecError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ExecError::NotFound(spec.command.display().to_string())
    } else {
        ExecError::Io(err)
    }
}

async fn collect_output(
    child: &mut Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
) -> Result<(ExitStatus, String, String), ExecError> {
    let (stdout, stderr) = stream_child_output(stdout, stderr).await?;
    let status = child.wait().await?;
    Ok((status, stdout, stderr))
}

/// Drain child stdout/stderr concurrently into full buffers.
pub async fn stream_child_output(
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
) -> Result<(String, String), ExecError> {
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();

    let mut stdout_reader = stdout.map(tokio::io::BufReader::new);
    let mut stderr_reader = stderr.map(tokio::io::BufReader::new);

    let mut stdout_done = stdout_reader.is_none();
    let mut stderr_done = stderr_reader.is_none();

    let mut stdout_chunk = vec![0u8; 8192];
    let mut stderr_chunk = vec![0u8; 8192];

    while !stdout_done || !stderr_done {
        tokio::select! {
            read = async {
                if let Some(reader) = stdout_reader.as_mut() {
                    reader.read(&mut stdout_chunk).await
                } else {
                    Ok(0)
                }
            }, if !stdout_done => {
                let read = read?;
                if read == 0 {
                    stdout_done = true;
                } else {
                    stdout_buf.extend_from_slice(&stdout_chunk[..read]);
                }
            }
            read = async {
                if let Some(reader) = stderr_reader.as_mut() {
                    reader.read(&mut stderr_chunk).await
                } else {
                    Ok(0)
                }
            }, if !stderr_done => {
                let read = read?;
                if read == 0 {
                    stderr_done = true;
                } else {
                    stderr_buf.extend_from_slice(&stderr_chunk[..read]);
                }
            }
        }
    }

    Ok((
        String::from_utf8_lossy(&stdout_buf).into_owned(),
        String::from_utf8_lossy(&stderr_buf).into_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use super::{CommandRunner, LocalCommandRunner};
    use crate::{CommandSpec, ExecError};
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    #[tokio::test]
    async fn local_runner_captures_output() {
        let runner = LocalCommandRunner::new();
        let spec = CommandSpec::new("sh").args(["-c", "printf 'out'; printf 'err' 1>&2; exit 3"]);
        let result = runner.run(spec).await.expect("run");
        assert_eq!(result.stdout, "out");
        assert_eq!(result.stderr, "err");
        assert_eq!(result.status_code, Some(3));
    }

    #[tokio::test]
    async fn local_runner_honours_cwd_and_env() {
        let workspace = tempdir().expect("workspace");
        let runner = LocalCommandRunner::new();
        let spec = CommandSpec::new("sh")
            .args(["-c", "printf '%s' \"$FRIDAY_TEST_VALUE\"; pwd"])
            .cwd(workspace.path())
            .env("FRIDAY_TEST_VALUE", "ok");
        let result = runner.run(spec).await.expect("run");
        let canonical = workspace.path().canonicalize().expect("canonical");
        assert!(result.stdout.starts_with("ok"));
        assert!(result.stdout.contains(canonical.to_string_lossy().as_ref()));
    }

    #[tokio::test]
    async fn local_runner_kills_on_timeout() {
        let runner = LocalCommandRunner::new();
        let spec = CommandSpec::new("sleep")
            .args(["5"])
            .timeout(Duration::from_millis(300));
        let started = Instant::now();
        let err = runner.run(spec).await.expect_err("timeout");
        assert!(started.elapsed() < Duration::from_secs(3));
        match err {
            ExecError::TimedOut { command, .. } => assert_eq!(command, "sleep 5"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeout_also_kills_processes_started_by_the_child() {
        let workspace = tempdir().expect("workspace");
        let marker = workspace.path().join("survived");
        let runner = LocalCommandRunner::new();
        let spec = CommandSpec::new("sh")
            .args(["-c", "(sleep 1; touch survived) & wait"])
            .cwd(workspace.path())
            .timeout(Duration::from_millis(300));
        let err = runner.run(spec).await.expect_err("timeout");
        assert!(matches!(err, ExecError::TimedOut { .. }), "{err:?}");

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "background job outlived the timeout");
    }

    #[tokio::test]
    async fn empty_program_is_rejected() {
        let runner = LocalCommandRunner::new();
        let err = runner
            .run(CommandSpec::new(""))
            .await
            .expect_err("empty program");
        assert!(matches!(err, ExecError::InvalidCommand(_)), "{err:?}");
        let err = runner
            .spawn(CommandSpec::new(""))
            .await
            .expect_err("empty program");
        assert!(matches!(err, ExecError::InvalidCommand(_)), "{err:?}");
    }

    #[tokio::test]
    async fn missing_program_is_not_found() {
        let runner = LocalCommandRunner::new();
        let err = runner
            .run(CommandSpec::new("friday-definitely-missing-binary"))
            .await
            .expect_err("missing");
        match err {
            ExecError::NotFound(command) => {
                assert_eq!(command, "friday-definitely-missing-binary")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn spawn_returns_pid_without_waiting() {
        let runner = LocalCommandRunner::new();
        let started = Instant::now();
        let pid = runner
            .spawn(CommandSpec::new("sleep").args(["2"]))
            .await
            .expect("spawn");
        assert!(pid > 0);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn locate_finds_shell() {
        let runner = LocalCommandRunner::new();
        assert!(runner.locate("sh").is_some());
        assert!(runner.locate("friday-definitely-missing-binary").is_none());
    }
}
