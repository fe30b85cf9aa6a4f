//! Conversions between command runner outcomes and tool errors.

use friday_rs_exec::{CommandResult, CommandRunner, CommandSpec, ExecError};
use friday_rs_protocol::ToolError;

/// Map a runner error to the tool error taxonomy.
pub fn exec_error(err: ExecError) -> ToolError {
    match err {
        ExecError::NotFound(program) => {
            ToolError::Unavailable(format!("required program '{program}' is not installed"))
        }
        ExecError::TimedOut { command, .. } => {
            ToolError::TimedOut(format!("Command timed out: {command}"))
        }
        ExecError::InvalidCommand(message) => ToolError::InvalidArguments(message),
        ExecError::Io(err) => ToolError::ExecutionFailed(err.to_string()),
    }
}

/// Run a command and treat a non-zero exit status as a failure.
pub async fn run_checked(
    runner: &dyn CommandRunner,
    spec: CommandSpec,
) -> Result<CommandResult, ToolError> {
    let display = spec.display();
    let result = runner.run(spec).await.map_err(exec_error)?;
    if result.success() {
        return Ok(result);
    }
    let stderr = result.stderr.trim();
    let reason = if stderr.is_empty() {
        format!(
            "'{display}' exited with status {}",
            result
                .status_code
                .map(|code| code.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        )
    } else {
        stderr.to_string()
    };
    Err(ToolError::ExecutionFailed(reason))
}
