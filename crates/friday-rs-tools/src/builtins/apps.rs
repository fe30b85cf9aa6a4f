//! Built-in tools for launching and closing applications and listing processes.

use crate::builtins::utils::{no_args_schema, parse_args, schema_of};
use crate::process::{exec_error, run_checked};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_exec::CommandSpec;
use friday_rs_protocol::{Capability, ToolError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, ProcessesToUpdate, Signal, System};

const TOP_PROCESSES: usize = 10;

/// Friendly application names and the desktop programs that provide them.
const APP_CANDIDATES: &[(&str, &[&str])] = &[
    ("notepad", &["gnome-text-editor", "gedit", "kate", "mousepad", "xed"]),
    ("text editor", &["gnome-text-editor", "gedit", "kate", "mousepad", "xed"]),
    ("calculator", &["gnome-calculator", "kcalc", "galculator", "qalculate-gtk"]),
    ("paint", &["pinta", "kolourpaint", "drawing"]),
    ("explorer", &["nautilus", "dolphin", "thunar", "nemo", "pcmanfm"]),
    ("files", &["nautilus", "dolphin", "thunar", "nemo", "pcmanfm"]),
    ("terminal", &["gnome-terminal", "konsole", "xfce4-terminal", "xterm"]),
    ("cmd", &["gnome-terminal", "konsole", "xfce4-terminal", "xterm"]),
    ("powershell", &["pwsh", "gnome-terminal", "konsole", "xterm"]),
    ("chrome", &["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"]),
    ("firefox", &["firefox"]),
    ("edge", &["microsoft-edge", "microsoft-edge-stable"]),
    ("code", &["code", "codium"]),
    ("vscode", &["code", "codium"]),
    ("discord", &["discord"]),
    ("teams", &["teams-for-linux", "teams"]),
    ("spotify", &["spotify"]),
    ("word", &["libreoffice --writer"]),
    ("excel", &["libreoffice --calc"]),
    ("powerpoint", &["libreoffice --impress"]),
    ("outlook", &["thunderbird", "evolution"]),
];

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct OpenArgs {
    #[input(description = "Application name (e.g., 'firefox', 'calculator', 'code', 'terminal')")]
    app_name: String,
    #[input(description = "Optional full path to the application executable")]
    #[serde(default)]
    app_path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct CloseArgs {
    #[input(description = "Process name to close (e.g., 'firefox', 'gedit')")]
    process_name: String,
}

fn candidates_for(name: &str) -> &'static [&'static str] {
    APP_CANDIDATES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, programs)| *programs)
        .unwrap_or(&[])
}

/// Split a candidate such as `libreoffice --writer` into a launch spec.
fn launch_spec(candidate: &str) -> Option<CommandSpec> {
    let mut parts = candidate.split_whitespace();
    let program = parts.next()?;
    Some(CommandSpec::new(program).args(parts))
}

/// Tool that launches desktop applications.
#[derive(Debug, Default)]
pub struct OpenApplicationTool;

#[async_trait]
impl Tool for OpenApplicationTool {
    fn capability(&self) -> Capability {
        Capability::OpenApplication
    }

    fn args_schema(&self) -> Value {
        schema_of(OpenArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: OpenArgs = parse_args(args)?;
        let runner = ctx.services.runner.as_ref();

        if let Some(app_path) = input.app_path.as_deref().filter(|path| !path.trim().is_empty()) {
            let path = ctx.resolve_path(app_path);
            if path.exists() {
                let pid = runner
                    .spawn(CommandSpec::new(&path).cwd(&ctx.services.cwd))
                    .await
                    .map_err(exec_error)?;
                info!("launched application from path (pid={pid})");
                return Ok(format!("Opened application from path: {app_path}"));
            }
        }

        let app_name = input.app_name.trim();
        if app_name.is_empty() {
            return Err(ToolError::InvalidArguments(
                "app_name cannot be empty".to_string(),
            ));
        }
        let lower = app_name.to_lowercase();

        for candidate in candidates_for(&lower) {
            let Some(spec) = launch_spec(candidate) else {
                continue;
            };
            let program = spec.command.display().to_string();
            if runner.locate(&program).is_none() {
                continue;
            }
            match runner.spawn(spec).await {
                Ok(pid) => {
                    info!("launched mapped application (program={program}, pid={pid})");
                    return Ok(format!("Opened {app_name} using {program}"));
                }
                Err(err) => debug!("mapped launch failed (program={program}): {err}"),
            }
        }

        if runner.locate(app_name).is_some() {
            match runner.spawn(CommandSpec::new(app_name)).await {
                Ok(pid) => {
                    info!("launched application by name (pid={pid})");
                    return Ok(format!("Opened application: {app_name}"));
                }
                Err(err) => debug!("direct launch failed: {err}"),
            }
        }

        if runner.locate("gtk-launch").is_some() {
            let spec = CommandSpec::new("gtk-launch")
                .args([app_name])
                .timeout(ctx.services.limits.helper_timeout);
            match run_checked(runner, spec).await {
                Ok(_) => return Ok(format!("Opened application: {app_name}")),
                Err(err) => debug!("gtk-launch failed: {err}"),
            }
        }

        Ok(format!(
            "Could not open application: {app_name}. Try providing the full path."
        ))
    }
}

/// Tool that terminates processes by name.
#[derive(Debug, Default)]
pub struct CloseApplicationTool;

#[async_trait]
impl Tool for CloseApplicationTool {
    fn capability(&self) -> Capability {
        Capability::CloseApplication
    }

    fn args_schema(&self) -> Value {
        schema_of(CloseArgs::io_schema())
    }

    async fn call(&self, _ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: CloseArgs = parse_args(args)?;
        let target = input.process_name.trim().to_string();
        if target.is_empty() {
            return Err(ToolError::InvalidArguments(
                "process_name cannot be empty".to_string(),
            ));
        }
        let closed = tokio::task::spawn_blocking(move || terminate_matching(&target))
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        info!("closed processes (count={closed})");
        if closed > 0 {
            Ok(format!(
                "Closed {closed} instance(s) of {}",
                input.process_name
            ))
        } else {
            Ok(format!("No running instances of {} found", input.process_name))
        }
    }
}

fn terminate_matching(target: &str) -> usize {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);
    let own_pid = std::process::id();
    let mut closed = 0;
    for process in system.processes().values() {
        if process.pid().as_u32() == own_pid
            || !process.name().to_string_lossy().eq_ignore_ascii_case(target)
        {
            continue;
        }
        let terminated = process
            .kill_with(Signal::Term)
            .unwrap_or_else(|| process.kill());
        if terminated {
            closed += 1;
        }
    }
    closed
}

/// A row of the process listing.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ProcessRow {
    pub(super) pid: u32,
    pub(super) name: String,
    pub(super) cpu: f32,
    pub(super) memory: f64,
}

fn sample_processes() -> Vec<ProcessRow> {
    let mut system = System::new();
    system.refresh_memory();
    system.refresh_processes(ProcessesToUpdate::All, true);
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    system.refresh_processes(ProcessesToUpdate::All, true);
    let total_memory = system.total_memory().max(1) as f64;
    system
        .processes()
        .values()
        .map(|process| ProcessRow {
            pid: process.pid().as_u32(),
            name: process.name().to_string_lossy().into_owned(),
            cpu: process.cpu_usage(),
            memory: process.memory() as f64 / total_memory * 100.0,
        })
        .collect()
}

/// Render the busiest processes, highest CPU first.
pub(super) fn render_top_processes(mut rows: Vec<ProcessRow>) -> String {
    rows.sort_by(|a, b| b.cpu.total_cmp(&a.cpu).then(a.pid.cmp(&b.pid)));
    let mut output = format!("Top {TOP_PROCESSES} running processes:\n");
    for row in rows.into_iter().take(TOP_PROCESSES) {
        output.push_str(&format!(
            "- {} (PID: {}) - CPU: {:.1}%, Memory: {:.1}%\n",
            row.name, row.pid, row.cpu, row.memory
        ));
    }
    output
}

/// Tool that lists the busiest processes.
#[derive(Debug, Default)]
pub struct GetRunningProcessesTool;

#[async_trait]
impl Tool for GetRunningProcessesTool {
    fn capability(&self) -> Capability {
        Capability::GetRunningProcesses
    }

    fn args_schema(&self) -> Value {
        no_args_schema()
    }

    async fn call(&self, _ctx: &ToolContext, _args: Value) -> Result<String, ToolError> {
        let rows = tokio::task::spawn_blocking(sample_processes)
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        Ok(render_top_processes(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::{ProcessRow, candidates_for, launch_spec, render_top_processes};
    use pretty_assertions::assert_eq;

    fn row(pid: u32, name: &str, cpu: f32) -> ProcessRow {
        ProcessRow {
            pid,
            name: name.to_string(),
            cpu,
            memory: 1.5,
        }
    }

    #[test]
    fn renders_top_ten_by_cpu() {
        let mut rows = (1..=12).map(|pid| row(pid, "idle", 0.0)).collect::<Vec<_>>();
        rows.push(row(99, "firefox", 42.0));
        let output = render_top_processes(rows);
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "Top 10 running processes:");
        assert_eq!(
            lines[1],
            "- firefox (PID: 99) - CPU: 42.0%, Memory: 1.5%"
        );
    }

    #[test]
    fn maps_friendly_names_to_programs() {
        assert!(candidates_for("calculator").contains(&"gnome-calculator"));
        assert!(candidates_for("unknown-app").is_empty());
        let spec = launch_spec("libreoffice --writer").expect("spec");
        assert_eq!(spec.display(), "libreoffice --writer");
    }
}
