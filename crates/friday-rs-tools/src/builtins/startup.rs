//! Built-in tool for managing XDG autostart entries.

use crate::builtins::utils::{parse_args, schema_of};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use directories::BaseDirs;
use friday_rs_protocol::{Capability, ToolError};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const DESKTOP_GROUP: &str = "[Desktop Entry]";

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct StartupArgs {
    #[input(description = "'list', 'add', or 'remove'")]
    action: String,
    #[input(description = "Name of the program (required for add/remove)")]
    #[serde(default)]
    program_name: Option<String>,
    #[input(description = "Path to the program executable (required for add)")]
    #[serde(default)]
    program_path: Option<String>,
}

/// One parsed autostart entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct AutostartEntry {
    pub(super) file: PathBuf,
    pub(super) name: String,
    pub(super) exec: String,
}

/// Read `Name` and `Exec` from the `[Desktop Entry]` group.
pub(super) fn parse_desktop_entry(file: &Path, content: &str) -> Option<AutostartEntry> {
    let mut in_group = false;
    let mut name = None;
    let mut exec = None;
    for line in content.lines().map(str::trim) {
        if line.starts_with('[') {
            in_group = line == DESKTOP_GROUP;
            continue;
        }
        if !in_group {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "Name" => name = Some(value.trim().to_string()),
                "Exec" => exec = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }
    let fallback = file.file_stem()?.to_string_lossy().into_owned();
    Some(AutostartEntry {
        file: file.to_path_buf(),
        name: name.unwrap_or(fallback),
        exec: exec?,
    })
}

/// Render a desktop entry that launches `exec` at login.
pub(super) fn render_desktop_entry(name: &str, path: &str) -> String {
    format!(
        "{DESKTOP_GROUP}\nType=Application\nName={name}\nExec={}\nX-GNOME-Autostart-enabled=true\n",
        shell_words::quote(path)
    )
}

/// File name for an entry; anything outside `[A-Za-z0-9._-]` becomes `-`.
pub(super) fn entry_file_name(name: &str) -> String {
    let stem = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect::<String>();
    format!("{stem}.desktop")
}

fn autostart_dir(ctx: &ToolContext) -> Result<PathBuf, ToolError> {
    if let Some(dir) = &ctx.services.autostart_dir {
        return Ok(dir.clone());
    }
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("autostart"))
        .ok_or_else(|| ToolError::Unavailable("autostart directory is not available".to_string()))
}

fn read_entries(dir: &Path) -> Result<Vec<AutostartEntry>, ToolError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let listing = fs::read_dir(dir).map_err(|err| {
        ToolError::ExecutionFailed(format!("{}: {err}", dir.display()))
    })?;
    let mut entries = Vec::new();
    for entry in listing.filter_map(Result::ok) {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("desktop") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        if let Some(parsed) = parse_desktop_entry(&path, &content) {
            entries.push(parsed);
        }
    }
    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(entries)
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ToolError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ToolError::InvalidArguments(format!("{field} is required for this action")))
}

/// Tool that lists, adds, and removes programs started at login.
#[derive(Debug, Default)]
pub struct ManageStartupProgramsTool;

#[async_trait]
impl Tool for ManageStartupProgramsTool {
    fn capability(&self) -> Capability {
        Capability::ManageStartupPrograms
    }

    fn args_schema(&self) -> Value {
        schema_of(StartupArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: StartupArgs = parse_args(args)?;
        let dir = autostart_dir(ctx)?;
        match input.action.as_str() {
            "list" => {
                let entries = read_entries(&dir)?;
                if entries.is_empty() {
                    return Ok("No startup programs found".to_string());
                }
                let mut output = "Startup programs:\n".to_string();
                for entry in &entries {
                    output.push_str(&format!("{}: {}\n", entry.name, entry.exec));
                }
                Ok(output)
            }
            "add" => {
                let name = required(&input.program_name, "program_name")?;
                let path = required(&input.program_path, "program_path")?;
                let resolved = ctx.resolve_path(path);
                fs::create_dir_all(&dir).map_err(|err| {
                    ToolError::ExecutionFailed(format!("{}: {err}", dir.display()))
                })?;
                let file = dir.join(entry_file_name(name));
                fs::write(&file, render_desktop_entry(name, &resolved.to_string_lossy()))
                    .map_err(|err| ToolError::ExecutionFailed(format!("{}: {err}", file.display())))?;
                info!("added autostart entry (file={})", file.display());
                Ok(format!("Added {name} to startup programs"))
            }
            "remove" => {
                let name = required(&input.program_name, "program_name")?;
                let direct = dir.join(entry_file_name(name));
                let target = if direct.is_file() {
                    Some(direct)
                } else {
                    read_entries(&dir)?
                        .into_iter()
                        .find(|entry| entry.name.eq_ignore_ascii_case(name))
                        .map(|entry| entry.file)
                };
                let Some(file) = target else {
                    return Ok(format!("Startup program '{name}' not found"));
                };
                fs::remove_file(&file).map_err(|err| {
                    ToolError::ExecutionFailed(format!("{}: {err}", file.display()))
                })?;
                info!("removed autostart entry (file={})", file.display());
                Ok(format!("Removed {name} from startup programs"))
            }
            _ => Err(ToolError::InvalidArguments(
                "Invalid action or missing parameters".to_string(),
            )),
        }
    }
}
