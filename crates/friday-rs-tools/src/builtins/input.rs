//! Built-in tools that simulate mouse and keyboard input.

use crate::builtins::utils::{
    lenient_float, lenient_int, lenient_opt_int, parse_args, plural, schema_of,
};
use crate::desktop::{MouseButton, Point, ScrollDirection};
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_protocol::{Capability, ToolError};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const MOUSE_SCROLL_STEPS: u32 = 3;
const KEYBOARD_TYPE_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct ClickArgs {
    #[input(description = "X coordinate to click")]
    #[serde(deserialize_with = "lenient_int")]
    x: i64,
    #[input(description = "Y coordinate to click")]
    #[serde(deserialize_with = "lenient_int")]
    y: i64,
    #[input(description = "Mouse button to use ('left', 'right', 'middle')")]
    #[serde(default = "default_button")]
    button: String,
    #[input(description = "Number of clicks (1 for single, 2 for double)")]
    #[serde(default = "default_clicks", deserialize_with = "lenient_int")]
    clicks: i64,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct TypeArgs {
    #[input(description = "Text to type")]
    text: String,
    #[input(description = "Interval between keystrokes in seconds")]
    #[serde(default, deserialize_with = "lenient_float")]
    interval: f64,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct KeysArgs {
    #[input(description = "Key combination separated by '+' (e.g., 'ctrl+c', 'alt+tab', 'win+r')")]
    keys: String,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct MouseArgs {
    #[input(
        description = "'click', 'double_click', 'right_click', 'drag', 'move', 'scroll_up', 'scroll_down'"
    )]
    action: String,
    #[input(description = "X coordinate for mouse actions")]
    #[serde(default, deserialize_with = "lenient_opt_int")]
    x: Option<i64>,
    #[input(description = "Y coordinate for mouse actions")]
    #[serde(default, deserialize_with = "lenient_opt_int")]
    y: Option<i64>,
    #[input(description = "Mouse button ('left', 'right', 'middle')")]
    #[serde(default = "default_button")]
    button: String,
    #[input(description = "Duration for drag operations in seconds")]
    #[serde(default = "default_duration", deserialize_with = "lenient_float")]
    duration: f64,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct KeyboardArgs {
    #[input(description = "'type', 'press', 'hotkey', 'hold', 'release'")]
    action: String,
    #[input(description = "Text to type")]
    #[serde(default)]
    text: Option<String>,
    #[input(description = "Key to press")]
    #[serde(default)]
    key: Option<String>,
    #[input(description = "Modifier key (ctrl, alt, shift, win)")]
    #[serde(default)]
    modifier: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct ScrollArgs {
    #[input(description = "'up', 'down', 'left', 'right'")]
    direction: String,
    #[input(description = "Number of scroll steps")]
    #[serde(default = "default_scroll_amount", deserialize_with = "lenient_int")]
    amount: i64,
}

fn default_button() -> String {
    "left".to_string()
}

fn default_clicks() -> i64 {
    1
}

fn default_duration() -> f64 {
    0.5
}

fn default_scroll_amount() -> i64 {
    3
}

fn parse_button(raw: &str) -> Result<MouseButton, ToolError> {
    MouseButton::parse(raw).ok_or_else(|| {
        ToolError::InvalidArguments(format!("Invalid button: {raw}. Use: left, right, middle"))
    })
}

fn seconds(value: f64, field: &str) -> Result<Duration, ToolError> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        ToolError::InvalidArguments(format!(
            "Invalid {field}: {value}. Use a non-negative number of seconds"
        ))
    })
}

/// Reject points outside the screen before any input is simulated.
async fn on_screen(ctx: &ToolContext, x: i64, y: i64) -> Result<Point, ToolError> {
    let size = ctx.services.desktop.screen_size().await?;
    if !size.contains(x, y) {
        return Err(ToolError::InvalidArguments(format!(
            "Invalid coordinates: ({x}, {y}). Screen size is {}x{}",
            size.width, size.height
        )));
    }
    Ok(Point { x, y })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Tool that clicks at a screen position.
#[derive(Debug, Default)]
pub struct ClickOnScreenTool;

#[async_trait]
impl Tool for ClickOnScreenTool {
    fn capability(&self) -> Capability {
        Capability::ClickOnScreen
    }

    fn args_schema(&self) -> Value {
        schema_of(ClickArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: ClickArgs = parse_args(args)?;
        let button = parse_button(&input.button)?;
        let clicks = u32::try_from(input.clicks)
            .ok()
            .filter(|clicks| *clicks >= 1)
            .ok_or_else(|| {
                ToolError::InvalidArguments(format!(
                    "Invalid click count: {}. Use at least 1",
                    input.clicks
                ))
            })?;
        let at = on_screen(ctx, input.x, input.y).await?;
        ctx.services.desktop.click(at, button, clicks).await?;
        let result = format!(
            "Clicked at ({}, {}) with {} button ({})",
            at.x,
            at.y,
            button,
            plural(input.clicks, "click")
        );
        info!("{result}");
        Ok(result)
    }
}

/// Tool that types text at the cursor.
#[derive(Debug, Default)]
pub struct TypeTextTool;

#[async_trait]
impl Tool for TypeTextTool {
    fn capability(&self) -> Capability {
        Capability::TypeText
    }

    fn args_schema(&self) -> Value {
        schema_of(TypeArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: TypeArgs = parse_args(args)?;
        let interval = seconds(input.interval, "interval")?;
        ctx.services
            .desktop
            .type_text(&input.text, interval)
            .await?;
        info!("typed text (chars={})", input.text.chars().count());
        Ok(format!("Typed text: '{}'", input.text))
    }
}

/// Tool that presses a keyboard shortcut.
#[derive(Debug, Default)]
pub struct PressKeyCombinationTool;

#[async_trait]
impl Tool for PressKeyCombinationTool {
    fn capability(&self) -> Capability {
        Capability::PressKeyCombination
    }

    fn args_schema(&self) -> Value {
        schema_of(KeysArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: KeysArgs = parse_args(args)?;
        let keys = input.keys.split('+').map(str::trim).collect::<Vec<_>>();
        if keys.iter().any(|key| key.is_empty()) {
            return Err(ToolError::InvalidArguments(format!(
                "Invalid key combination: '{}'. Separate keys with '+' (e.g., 'ctrl+c')",
                input.keys
            )));
        }
        ctx.services.desktop.press_keys(&keys).await?;
        Ok(format!("Pressed key combination: {}", input.keys))
    }
}

/// Tool for pointer actions including drags and scrolling.
#[derive(Debug, Default)]
pub struct MouseAutomationTool;

#[async_trait]
impl Tool for MouseAutomationTool {
    fn capability(&self) -> Capability {
        Capability::MouseAutomation
    }

    fn args_schema(&self) -> Value {
        schema_of(MouseArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: MouseArgs = parse_args(args)?;
        let desktop = &ctx.services.desktop;
        let action = input.action.as_str();

        match action {
            "scroll_up" => {
                desktop
                    .scroll(ScrollDirection::Up, MOUSE_SCROLL_STEPS)
                    .await?;
                return Ok("Scrolled up".to_string());
            }
            "scroll_down" => {
                desktop
                    .scroll(ScrollDirection::Down, MOUSE_SCROLL_STEPS)
                    .await?;
                return Ok("Scrolled down".to_string());
            }
            "click" | "double_click" | "right_click" | "move" | "drag" => {}
            _ => {
                return Err(ToolError::InvalidArguments(
                    "Invalid action. Use: click, double_click, right_click, move, drag, scroll_up, scroll_down"
                        .to_string(),
                ));
            }
        }

        let (Some(x), Some(y)) = (input.x, input.y) else {
            return Err(ToolError::InvalidArguments(
                "Coordinates (x, y) are required for this action".to_string(),
            ));
        };
        let button = parse_button(&input.button)?;
        let duration = seconds(input.duration, "duration")?;
        let at = on_screen(ctx, x, y).await?;

        match action {
            "click" => {
                desktop.click(at, button, 1).await?;
                Ok(format!("Clicked at ({x}, {y}) with {button} button"))
            }
            "double_click" => {
                desktop.click(at, button, 2).await?;
                Ok(format!("Double-clicked at ({x}, {y}) with {button} button"))
            }
            "right_click" => {
                desktop.click(at, MouseButton::Right, 1).await?;
                Ok(format!("Right-clicked at ({x}, {y})"))
            }
            "move" => {
                desktop.move_mouse(at).await?;
                Ok(format!("Moved mouse to ({x}, {y})"))
            }
            _ => {
                let from = desktop.mouse_position().await?;
                desktop.drag(at, button, duration).await?;
                Ok(format!(
                    "Dragged from ({}, {}) to ({x}, {y})",
                    from.x, from.y
                ))
            }
        }
    }
}

/// Tool for keyboard actions with modifiers and held keys.
#[derive(Debug, Default)]
pub struct KeyboardAutomationTool;

#[async_trait]
impl Tool for KeyboardAutomationTool {
    fn capability(&self) -> Capability {
        Capability::KeyboardAutomation
    }

    fn args_schema(&self) -> Value {
        schema_of(KeyboardArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: KeyboardArgs = parse_args(args)?;
        let desktop = &ctx.services.desktop;
        let text = non_empty(input.text.as_deref());
        let key = non_empty(input.key.as_deref());
        let modifier = non_empty(input.modifier.as_deref());

        match (input.action.as_str(), text, key, modifier) {
            ("type", Some(text), _, _) => {
                desktop.type_text(text, KEYBOARD_TYPE_INTERVAL).await?;
                Ok(format!("Typed: {text}"))
            }
            ("press", _, Some(key), _) => {
                desktop.press_keys(&[key]).await?;
                Ok(format!("Pressed key: {key}"))
            }
            ("hotkey", _, Some(key), Some(modifier)) => {
                desktop.press_keys(&[modifier, key]).await?;
                Ok(format!("Pressed hotkey: {modifier}+{key}"))
            }
            ("hold", _, Some(key), _) => {
                desktop.key_down(key).await?;
                Ok(format!("Holding key: {key}"))
            }
            ("release", _, Some(key), _) => {
                desktop.key_up(key).await?;
                Ok(format!("Released key: {key}"))
            }
            _ => Err(ToolError::InvalidArguments(
                "Invalid action or missing parameters".to_string(),
            )),
        }
    }
}

/// Tool that scrolls the focused window.
#[derive(Debug, Default)]
pub struct ScrollPageTool;

#[async_trait]
impl Tool for ScrollPageTool {
    fn capability(&self) -> Capability {
        Capability::ScrollPage
    }

    fn args_schema(&self) -> Value {
        schema_of(ScrollArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: ScrollArgs = parse_args(args)?;
        let direction = ScrollDirection::parse(&input.direction).ok_or_else(|| {
            ToolError::InvalidArguments("Invalid direction. Use: up, down, left, right".to_string())
        })?;
        let steps = u32::try_from(input.amount).map_err(|_| {
            ToolError::InvalidArguments(format!(
                "Invalid amount: {}. Use a non-negative number of steps",
                input.amount
            ))
        })?;
        ctx.services.desktop.scroll(direction, steps).await?;
        Ok(format!("Scrolled {direction} {steps} times"))
    }
}
