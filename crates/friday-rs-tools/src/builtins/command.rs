//! Built-in tool for running system commands with a bounded wait.

use crate::builtins::utils::{lenient_bool, parse_args, schema_of};
use crate::process::exec_error;
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_exec::{CommandResult, CommandSpec, ExecError};
use friday_rs_protocol::{Capability, ToolError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct RunArgs {
    #[input(description = "Command to execute")]
    command: String,
    #[input(description = "Whether to run in shell mode")]
    #[serde(default = "default_shell", deserialize_with = "lenient_bool")]
    shell: bool,
}

fn default_shell() -> bool {
    true
}

/// Build the process spec: `sh -c` in shell mode, otherwise a shell-words split.
fn command_spec(command: &str, shell: bool) -> Result<CommandSpec, ToolError> {
    if shell {
        return Ok(CommandSpec::new("sh").args(["-c", command]));
    }
    let argv = shell_words::split(command)
        .map_err(|err| ToolError::InvalidArguments(format!("Invalid command: {err}")))?;
    let Some((program, args)) = argv.split_first() else {
        return Err(ToolError::InvalidArguments(
            "command cannot be empty".to_string(),
        ));
    };
    Ok(CommandSpec::new(program).args(args.iter().cloned()))
}

/// Render a finished run the way the assistant reports it.
fn render_result(command: &str, result: &CommandResult) -> String {
    let mut output = format!(
        "Command: {command}\nReturn code: {}\n",
        result.status_code.unwrap_or(-1)
    );
    if !result.stdout.is_empty() {
        output.push_str(&format!("Output:\n{}\n", result.stdout));
    }
    if !result.stderr.is_empty() {
        output.push_str(&format!("Errors:\n{}\n", result.stderr));
    }
    output
}

/// Tool that runs a command and reports its exit status and output.
#[derive(Debug, Default)]
pub struct RunCommandTool;

#[async_trait]
impl Tool for RunCommandTool {
    fn capability(&self) -> Capability {
        Capability::RunCommand
    }

    fn args_schema(&self) -> Value {
        schema_of(RunArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: RunArgs = parse_args(args)?;
        if input.command.trim().is_empty() {
            return Err(ToolError::InvalidArguments(
                "command cannot be empty".to_string(),
            ));
        }
        let spec = command_spec(&input.command, input.shell)?
            .cwd(&ctx.services.cwd)
            .timeout(ctx.services.limits.command_timeout);
        info!(
            "executing command (shell={}, args_len={})",
            input.shell,
            spec.args.len()
        );
        match ctx.services.runner.run(spec).await {
            Ok(result) => Ok(render_result(&input.command, &result)),
            Err(ExecError::TimedOut { after, .. }) => {
                warn!("command timed out (timeout_ms={})", after.as_millis());
                Err(ToolError::TimedOut(format!(
                    "Command timed out: {}",
                    input.command
                )))
            }
            Err(ExecError::NotFound(program)) => Err(ToolError::ExecutionFailed(format!(
                "command not found: {program}"
            ))),
            Err(err) => Err(exec_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{command_spec, render_result};
    use friday_rs_exec::CommandResult;
    use friday_rs_protocol::ToolError;
    use pretty_assertions::assert_eq;

    #[test]
    fn shell_mode_wraps_in_sh() {
        let spec = command_spec("echo hi | tr a-z A-Z", true).expect("spec");
        assert_eq!(spec.display(), "sh -c echo hi | tr a-z A-Z");
    }

    #[test]
    fn direct_mode_splits_words() {
        let spec = command_spec("printf '%s done' \"a b\"", false).expect("spec");
        assert_eq!(spec.command.display().to_string(), "printf");
        assert_eq!(spec.args, vec!["%s done".to_string(), "a b".to_string()]);
        assert!(matches!(
            command_spec("echo 'unterminated", false),
            Err(ToolError::InvalidArguments(_))
        ));
    }

    #[test]
    fn renders_sections_only_when_present() {
        let result = CommandResult {
            status_code: Some(0),
            stdout: "hello\n".to_string(),
            stderr: String::new(),
        };
        assert_eq!(
            render_result("echo hello", &result),
            "Command: echo hello\nReturn code: 0\nOutput:\nhello\n\n"
        );
        let killed = CommandResult {
            status_code: None,
            stdout: String::new(),
            stderr: "boom".to_string(),
        };
        assert_eq!(
            render_result("x", &killed),
            "Command: x\nReturn code: -1\nErrors:\nboom\n"
        );
    }
}
