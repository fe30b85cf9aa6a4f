//! Built-in tools for window management.

use crate::builtins::utils::{lenient_opt_int, parse_args, schema_of};
use crate::desktop::{Point, WindowInfo};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_protocol::{Capability, ToolError};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const LISTED_WINDOWS: usize = 20;
const MISSING_PARAMETERS: &str = "Invalid action or missing parameters";

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct WindowArgs {
    #[input(
        description = "'minimize_all', 'show_desktop', 'alt_tab', 'minimize_current', 'maximize_current'"
    )]
    action: String,
    #[input(description = "Optional window title, unused by these actions")]
    #[serde(default)]
    window_title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct AdvancedWindowArgs {
    #[input(description = "'find', 'focus', 'move', 'resize', 'close', 'list_windows'")]
    action: String,
    #[input(description = "Window title to find (case-insensitive partial match)")]
    #[serde(default)]
    window_title: Option<String>,
    #[input(description = "New x position for the move action")]
    #[serde(default, deserialize_with = "lenient_opt_int")]
    x: Option<i64>,
    #[input(description = "New y position for the move action")]
    #[serde(default, deserialize_with = "lenient_opt_int")]
    y: Option<i64>,
    #[input(description = "New width for the resize action")]
    #[serde(default, deserialize_with = "lenient_opt_int")]
    width: Option<i64>,
    #[input(description = "New height for the resize action")]
    #[serde(default, deserialize_with = "lenient_opt_int")]
    height: Option<i64>,
}

/// Key chord and acknowledgement for each window action.
fn window_chord(action: &str) -> Option<(&'static [&'static str], &'static str)> {
    match action {
        "minimize_all" => Some((&["ctrl", "super", "d"], "Minimized all windows")),
        "show_desktop" => Some((&["super", "d"], "Showing desktop")),
        "alt_tab" => Some((&["alt", "tab"], "Switched between windows")),
        "minimize_current" => Some((&["super", "h"], "Minimized current window")),
        "maximize_current" => Some((&["super", "up"], "Maximized current window")),
        _ => None,
    }
}

/// First window whose title contains `needle`, ignoring case.
pub(super) fn find_window<'a>(windows: &'a [WindowInfo], needle: &str) -> Option<&'a WindowInfo> {
    let needle = needle.to_lowercase();
    windows
        .iter()
        .find(|window| window.title.to_lowercase().contains(&needle))
}

/// Tool for common window-manager shortcuts.
#[derive(Debug, Default)]
pub struct WindowManagementTool;

#[async_trait]
impl Tool for WindowManagementTool {
    fn capability(&self) -> Capability {
        Capability::WindowManagement
    }

    fn args_schema(&self) -> Value {
        schema_of(WindowArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: WindowArgs = parse_args(args)?;
        let Some((keys, result)) = window_chord(&input.action) else {
            return Err(ToolError::InvalidArguments(
                "Invalid action. Use: minimize_all, show_desktop, alt_tab, minimize_current, maximize_current"
                    .to_string(),
            ));
        };
        ctx.services.desktop.press_keys(keys).await?;
        info!("{result}");
        Ok(result.to_string())
    }
}

/// Tool that finds, focuses, moves, resizes, and closes specific windows.
#[derive(Debug, Default)]
pub struct AdvancedWindowControlTool;

#[async_trait]
impl Tool for AdvancedWindowControlTool {
    fn capability(&self) -> Capability {
        Capability::AdvancedWindowControl
    }

    fn args_schema(&self) -> Value {
        schema_of(AdvancedWindowArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: AdvancedWindowArgs = parse_args(args)?;
        let desktop = &ctx.services.desktop;
        let action = input.action.as_str();
        if !matches!(
            action,
            "list_windows" | "find" | "focus" | "move" | "resize" | "close"
        ) {
            return Err(ToolError::InvalidArguments(MISSING_PARAMETERS.to_string()));
        }

        let windows = desktop.windows().await?;
        if action == "list_windows" {
            if windows.is_empty() {
                return Ok("No open windows found".to_string());
            }
            let mut output = "Open windows:\n".to_string();
            for window in windows.iter().take(LISTED_WINDOWS) {
                output.push_str(&format!("- {}\n", window.title));
            }
            return Ok(output);
        }

        let Some(title) = input
            .window_title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
        else {
            return Err(ToolError::InvalidArguments(
                "Window title is required for this action".to_string(),
            ));
        };
        let Some(window) = find_window(&windows, title) else {
            return Ok(format!("Window with title containing '{title}' not found"));
        };

        match (action, input.x, input.y, input.width, input.height) {
            ("find", ..) => Ok(format!("Found window: {}", window.title)),
            ("focus", ..) => {
                desktop.focus_window(window).await?;
                Ok(format!("Focused window: {}", window.title))
            }
            ("move", Some(x), Some(y), _, _) => {
                desktop.move_window(window, Point { x, y }).await?;
                Ok(format!("Moved window to ({x}, {y})"))
            }
            ("resize", _, _, Some(width), Some(height)) => {
                let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
                    return Err(ToolError::InvalidArguments(format!(
                        "Invalid window size: {width}x{height}"
                    )));
                };
                if w == 0 || h == 0 {
                    return Err(ToolError::InvalidArguments(format!(
                        "Invalid window size: {width}x{height}"
                    )));
                }
                desktop.resize_window(window, w, h).await?;
                Ok(format!("Resized window to {w}x{h}"))
            }
            ("close", ..) => {
                desktop.close_window(window).await?;
                Ok(format!("Closed window: {}", window.title))
            }
            _ => Err(ToolError::InvalidArguments(MISSING_PARAMETERS.to_string())),
        }
    }
}
