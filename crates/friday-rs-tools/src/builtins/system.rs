//! Built-in tools for system metrics and audio volume.

use crate::builtins::utils::{lenient_opt_int, no_args_schema, parse_args, schema_of};
use crate::process::run_checked;
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_exec::CommandSpec;
use friday_rs_protocol::{Capability, ToolError};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, System};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const DEFAULT_SINK: &str = "@DEFAULT_SINK@";

/// Point-in-time host metrics.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SystemSnapshot {
    pub(super) cpu_percent: f32,
    pub(super) cpu_count: usize,
    pub(super) memory_used: u64,
    pub(super) memory_total: u64,
    pub(super) disk_used: u64,
    pub(super) disk_total: u64,
    pub(super) platform: String,
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

impl SystemSnapshot {
    fn collect() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_cpu_usage();
        system.refresh_memory();

        let disks = Disks::new_with_refreshed_list();
        let root = disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == Path::new("/"))
            .or_else(|| disks.list().first());
        let (disk_used, disk_total) = root
            .map(|disk| {
                let total = disk.total_space();
                (total.saturating_sub(disk.available_space()), total)
            })
            .unwrap_or((0, 0));

        let platform = match System::long_os_version() {
            Some(version) => format!("{} ({version})", std::env::consts::OS),
            None => std::env::consts::OS.to_string(),
        };

        Self {
            cpu_percent: system.global_cpu_usage(),
            cpu_count: system.cpus().len(),
            memory_used: system.used_memory(),
            memory_total: system.total_memory(),
            disk_used,
            disk_total,
            platform,
        }
    }

    pub(super) fn render(&self) -> String {
        format!(
            "System Information:\nCPU: {:.1}% usage ({} cores)\nMemory: {:.1}% usage ({:.2}GB / {:.2}GB)\nDisk: {:.1}% usage ({:.2}GB / {:.2}GB)\nPlatform: {}",
            self.cpu_percent,
            self.cpu_count,
            percent(self.memory_used, self.memory_total),
            self.memory_used as f64 / GIB,
            self.memory_total as f64 / GIB,
            percent(self.disk_used, self.disk_total),
            self.disk_used as f64 / GIB,
            self.disk_total as f64 / GIB,
            self.platform
        )
    }
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct VolumeArgs {
    #[input(description = "'mute', 'unmute', 'up', 'down', or 'set'")]
    action: String,
    #[input(description = "Volume level (0-100) when action is 'set'")]
    #[serde(default, deserialize_with = "lenient_opt_int")]
    level: Option<i64>,
}

/// Tool that reports CPU, memory, and disk usage.
#[derive(Debug, Default)]
pub struct GetSystemInfoTool;

#[async_trait]
impl Tool for GetSystemInfoTool {
    fn capability(&self) -> Capability {
        Capability::GetSystemInfo
    }

    fn args_schema(&self) -> Value {
        no_args_schema()
    }

    async fn call(&self, _ctx: &ToolContext, _args: Value) -> Result<String, ToolError> {
        let snapshot = tokio::task::spawn_blocking(SystemSnapshot::collect)
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        info!(
            "system information retrieved (cpu_count={})",
            snapshot.cpu_count
        );
        Ok(snapshot.render())
    }
}

/// Tool that adjusts the default audio sink through PulseAudio/PipeWire.
#[derive(Debug, Default)]
pub struct ControlVolumeTool;

#[async_trait]
impl Tool for ControlVolumeTool {
    fn capability(&self) -> Capability {
        Capability::ControlVolume
    }

    fn args_schema(&self) -> Value {
        schema_of(VolumeArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: VolumeArgs = parse_args(args)?;
        let (pactl_args, result) = match (input.action.as_str(), input.level) {
            ("mute", _) => (
                ["set-sink-mute", DEFAULT_SINK, "1"].map(String::from),
                "Volume muted".to_string(),
            ),
            ("unmute", _) => (
                ["set-sink-mute", DEFAULT_SINK, "0"].map(String::from),
                "Volume unmuted".to_string(),
            ),
            ("up", _) => (
                ["set-sink-volume", DEFAULT_SINK, "+5%"].map(String::from),
                "Volume increased".to_string(),
            ),
            ("down", _) => (
                ["set-sink-volume", DEFAULT_SINK, "-5%"].map(String::from),
                "Volume decreased".to_string(),
            ),
            ("set", Some(level)) => {
                if !(0..=100).contains(&level) {
                    return Err(ToolError::InvalidArguments(format!(
                        "Invalid volume level: {level}. Use a value between 0 and 100"
                    )));
                }
                (
                    [
                        "set-sink-volume".to_string(),
                        DEFAULT_SINK.to_string(),
                        format!("{level}%"),
                    ],
                    format!("Volume set to {level}%"),
                )
            }
            _ => {
                return Err(ToolError::InvalidArguments(
                    "Invalid action. Use: mute, unmute, up, down, or set (with level)".to_string(),
                ));
            }
        };
        let spec = CommandSpec::new("pactl")
            .args(pactl_args)
            .timeout(ctx.services.limits.helper_timeout);
        run_checked(ctx.services.runner.as_ref(), spec).await?;
        info!("{result}");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{GIB, SystemSnapshot};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_usage_report() {
        let gib = GIB as u64;
        let snapshot = SystemSnapshot {
            cpu_percent: 12.5,
            cpu_count: 8,
            memory_used: 4 * gib,
            memory_total: 16 * gib,
            disk_used: 50 * gib,
            disk_total: 200 * gib,
            platform: "linux".to_string(),
        };
        assert_eq!(
            snapshot.render(),
            "System Information:\nCPU: 12.5% usage (8 cores)\nMemory: 25.0% usage (4.00GB / 16.00GB)\nDisk: 25.0% usage (50.00GB / 200.00GB)\nPlatform: linux"
        );
    }

    #[test]
    fn empty_totals_do_not_divide_by_zero() {
        let snapshot = SystemSnapshot {
            cpu_percent: 0.0,
            cpu_count: 1,
            memory_used: 0,
            memory_total: 0,
            disk_used: 0,
            disk_total: 0,
            platform: "linux".to_string(),
        };
        assert!(snapshot.render().contains("Disk: 0.0% usage"));
    }
}
