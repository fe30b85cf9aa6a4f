//! Built-in tool for shutdown, restart, suspend, hibernate, and lock.

use crate::builtins::utils::{lenient_int, parse_args, schema_of};
use crate::process::{exec_error, run_checked};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_exec::CommandSpec;
use friday_rs_protocol::{Capability, ToolError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct PowerArgs {
    #[input(description = "'shutdown', 'restart', 'sleep', 'hibernate', 'lock'")]
    action: String,
    #[input(description = "Delay in seconds before shutdown or restart")]
    #[serde(default, deserialize_with = "lenient_int")]
    delay: i64,
}

/// Power actions and the session/system managers that perform them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PowerAction {
    Shutdown,
    Restart,
    Sleep,
    Hibernate,
    Lock,
}

impl PowerAction {
    pub(super) fn parse(action: &str) -> Option<Self> {
        match action {
            "shutdown" => Some(Self::Shutdown),
            "restart" => Some(Self::Restart),
            "sleep" => Some(Self::Sleep),
            "hibernate" => Some(Self::Hibernate),
            "lock" => Some(Self::Lock),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Shutdown => "shutdown",
            Self::Restart => "restart",
            Self::Sleep => "sleep",
            Self::Hibernate => "hibernate",
            Self::Lock => "lock",
        }
    }

    /// Program and arguments that perform the action immediately.
    pub(super) fn command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Shutdown => ("systemctl", &["poweroff"]),
            Self::Restart => ("systemctl", &["reboot"]),
            Self::Sleep => ("systemctl", &["suspend"]),
            Self::Hibernate => ("systemctl", &["hibernate"]),
            Self::Lock => ("loginctl", &["lock-session"]),
        }
    }

    fn delayable(self) -> bool {
        matches!(self, Self::Shutdown | Self::Restart)
    }
}

/// Detached `sh -c` script that sleeps before running the action.
pub(super) fn delayed_spec(action: PowerAction, delay: u64) -> CommandSpec {
    let (program, args) = action.command();
    let script = format!("sleep {delay} && {program} {}", args.join(" "));
    CommandSpec::new("sh").args(["-c".to_string(), script])
}

/// Tool that manages system power state.
#[derive(Debug, Default)]
pub struct PowerManagementTool;

#[async_trait]
impl Tool for PowerManagementTool {
    fn capability(&self) -> Capability {
        Capability::PowerManagement
    }

    fn args_schema(&self) -> Value {
        schema_of(PowerArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: PowerArgs = parse_args(args)?;
        let Some(action) = PowerAction::parse(&input.action) else {
            return Err(ToolError::InvalidArguments(
                "Invalid action. Use: shutdown, restart, sleep, hibernate, lock".to_string(),
            ));
        };
        let Ok(delay) = u64::try_from(input.delay) else {
            return Err(ToolError::InvalidArguments(format!(
                "Invalid delay: {}. Use a non-negative number of seconds",
                input.delay
            )));
        };
        let runner = ctx.services.runner.as_ref();
        let label = action.label();

        if action.delayable() && delay > 0 {
            let pid = runner
                .spawn(delayed_spec(action, delay))
                .await
                .map_err(exec_error)?;
            warn!("scheduled power action (action={label}, delay_secs={delay}, pid={pid})");
            return Ok(format!("System will {label} in {delay} seconds"));
        }

        let (program, args) = action.command();
        let spec = CommandSpec::new(program)
            .args(args.iter().copied())
            .timeout(ctx.services.limits.helper_timeout);
        run_checked(runner, spec).await?;
        info!("executed power action (action={label})");
        Ok(format!("Executing {label}"))
    }
}
