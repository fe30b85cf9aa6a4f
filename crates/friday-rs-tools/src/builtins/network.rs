//! Built-in tool for network interfaces, Wi-Fi radio, and reachability.

use crate::builtins::utils::{parse_args, schema_of};
use crate::process::{exec_error, run_checked};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_exec::CommandSpec;
use friday_rs_protocol::{Capability, ToolError};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const PING_COUNT: &str = "4";

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct NetworkArgs {
    #[input(description = "'list_interfaces', 'disable_wifi', 'enable_wifi', 'get_ip', 'ping'")]
    action: String,
    #[input(description = "Interface name, or the host to reach for 'ping'")]
    #[serde(default)]
    interface: Option<String>,
}

/// Hosts are passed as a single argument; reject anything ping would parse as a flag.
fn ping_host(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|host| !host.is_empty() && !host.starts_with('-'))
        .filter(|host| !host.chars().any(char::is_whitespace))
}

/// Tool that inspects and toggles networking through NetworkManager and iproute2.
#[derive(Debug, Default)]
pub struct NetworkControlTool;

#[async_trait]
impl Tool for NetworkControlTool {
    fn capability(&self) -> Capability {
        Capability::NetworkControl
    }

    fn args_schema(&self) -> Value {
        schema_of(NetworkArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: NetworkArgs = parse_args(args)?;
        let runner = ctx.services.runner.as_ref();
        let helper = |program: &str, args: &[&str]| {
            CommandSpec::new(program)
                .args(args.iter().copied())
                .timeout(ctx.services.limits.helper_timeout)
        };

        match input.action.as_str() {
            "list_interfaces" => {
                let result = run_checked(runner, helper("nmcli", &["device", "status"])).await?;
                Ok(format!("Network interfaces:\n{}", result.stdout))
            }
            "disable_wifi" => {
                run_checked(runner, helper("nmcli", &["radio", "wifi", "off"])).await?;
                info!("wifi radio disabled");
                Ok("Wi-Fi disabled".to_string())
            }
            "enable_wifi" => {
                run_checked(runner, helper("nmcli", &["radio", "wifi", "on"])).await?;
                info!("wifi radio enabled");
                Ok("Wi-Fi enabled".to_string())
            }
            "get_ip" => {
                let mut args = vec!["addr", "show"];
                if let Some(interface) = input
                    .interface
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                {
                    args.extend(["dev", interface]);
                }
                let result = run_checked(runner, helper("ip", &args[..])).await?;
                Ok(format!("IP Configuration:\n{}", result.stdout))
            }
            "ping" => {
                let Some(host) = ping_host(input.interface.as_deref()) else {
                    return Err(ToolError::InvalidArguments(
                        "Invalid action or missing parameters".to_string(),
                    ));
                };
                let spec = CommandSpec::new("ping")
                    .args(["-c", PING_COUNT, host])
                    .timeout(ctx.services.limits.command_timeout);
                // Unreachable hosts exit non-zero but still print a useful summary.
                let result = runner.run(spec).await.map_err(exec_error)?;
                let body = if result.stdout.trim().is_empty() {
                    result.stderr
                } else {
                    result.stdout
                };
                info!("ping finished (status={:?})", result.status_code);
                Ok(format!("Ping results for {host}:\n{body}"))
            }
            _ => Err(ToolError::InvalidArguments(
                "Invalid action or missing parameters".to_string(),
            )),
        }
    }
}
