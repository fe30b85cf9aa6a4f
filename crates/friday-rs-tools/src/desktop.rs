//! Desktop automation backend: pointer, keyboard, screen capture, and windows.
//!
//! The X11 implementation drives `xdotool`, ImageMagick (`import`, `identify`,
//! `compare`), and `wmctrl` through the shared [`CommandRunner`].

use crate::process::{exec_error, run_checked};
use async_trait::async_trait;
use friday_rs_exec::{CommandRunner, CommandSpec};
use friday_rs_protocol::ToolError;
use log::debug;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

/// `compare -subimage-search` result: score, optional normalized score, offset.
static COMPARE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"([0-9.eE+-]+)(?:\s*\(([0-9.eE+-]+)\))?\s*@\s*(-?\d+),(-?\d+)").ok()
});

/// One `wmctrl -l` row: id, desktop, host, title.
static WINDOW_ROW_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(0x[0-9a-fA-F]+)\s+(-?\d+)\s+(\S+)\s?(.*)$").ok());

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    /// Whether a point lies on the screen (`0 <= x < width`, `0 <= y < height`).
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }
}

/// Pointer position in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// Rectangular screen area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Center point of the region.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + i64::from(self.width / 2),
            y: self.y + i64::from(self.height / 2),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left={}, top={}, width={}, height={}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Mouse buttons understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Parse a user-facing button name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "middle" => Some(Self::Middle),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    fn x11_code(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Middle => 2,
            Self::Right => 3,
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Middle => "middle",
            Self::Right => "right",
        })
    }
}

/// Scroll directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    /// Parse a user-facing direction name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    fn x11_button(self) -> u8 {
        match self {
            Self::Up => 4,
            Self::Down => 5,
            Self::Left => 6,
            Self::Right => 7,
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// A top-level window known to the window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Window manager id (hex, as printed by `wmctrl -l`).
    pub id: String,
    /// Window title.
    pub title: String,
}

/// Desktop automation interface used by screen, input, and window tools.
#[async_trait]
pub trait DesktopBackend: Send + Sync {
    /// Current screen size.
    async fn screen_size(&self) -> Result<ScreenSize, ToolError>;
    /// Current pointer position.
    async fn mouse_position(&self) -> Result<Point, ToolError>;
    /// Move the pointer to an absolute position.
    async fn move_mouse(&self, to: Point) -> Result<(), ToolError>;
    /// Click `clicks` times at a position.
    async fn click(&self, at: Point, button: MouseButton, clicks: u32) -> Result<(), ToolError>;
    /// Press a button at the current position, move to `to`, and release.
    async fn drag(&self, to: Point, button: MouseButton, duration: Duration)
    -> Result<(), ToolError>;
    /// Scroll `steps` notches in a direction.
    async fn scroll(&self, direction: ScrollDirection, steps: u32) -> Result<(), ToolError>;
    /// Type text with a delay between keystrokes.
    async fn type_text(&self, text: &str, interval: Duration) -> Result<(), ToolError>;
    /// Press a chord of keys together.
    async fn press_keys(&self, keys: &[&str]) -> Result<(), ToolError>;
    /// Hold a key down.
    async fn key_down(&self, key: &str) -> Result<(), ToolError>;
    /// Release a held key.
    async fn key_up(&self, key: &str) -> Result<(), ToolError>;
    /// Write a PNG screenshot of the screen or a region to `dest`.
    async fn capture(&self, dest: &Path, region: Option<Region>) -> Result<(), ToolError>;
    /// Find a template image on screen, returning its region when the match
    /// score reaches `confidence`.
    async fn locate(&self, template: &Path, confidence: f64)
    -> Result<Option<Region>, ToolError>;
    /// Visible titled top-level windows.
    async fn windows(&self) -> Result<Vec<WindowInfo>, ToolError>;
    /// Raise and focus a window.
    async fn focus_window(&self, window: &WindowInfo) -> Result<(), ToolError>;
    /// Move a window keeping its size.
    async fn move_window(&self, window: &WindowInfo, to: Point) -> Result<(), ToolError>;
    /// Resize a window keeping its position.
    async fn resize_window(
        &self,
        window: &WindowInfo,
        width: u32,
        height: u32,
    ) -> Result<(), ToolError>;
    /// Ask a window to close.
    async fn close_window(&self, window: &WindowInfo) -> Result<(), ToolError>;
}

/// X11 backend built on xdotool, ImageMagick, and wmctrl.
#[derive(Clone)]
pub struct XdoDesktop {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl XdoDesktop {
    /// Create a backend that bounds every helper call by `timeout`.
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    async fn helper<I, S>(&self, program: &str, args: I) -> Result<String, ToolError>
    where
        I: IntoIterator<Item = S> + Send,
        S: Into<String>,
    {
        let spec = CommandSpec::new(program).args(args).timeout(self.timeout);
        debug!("desktop helper (command={})", spec.display());
        let result = run_checked(self.runner.as_ref(), spec).await?;
        Ok(result.stdout)
    }

    async fn xdotool<I, S>(&self, args: I) -> Result<String, ToolError>
    where
        I: IntoIterator<Item = S> + Send,
        S: Into<String>,
    {
        self.helper("xdotool", args).await
    }

    async fn wmctrl<I, S>(&self, args: I) -> Result<(), ToolError>
    where
        I: IntoIterator<Item = S> + Send,
        S: Into<String>,
    {
        self.helper("wmctrl", args).await.map(|_| ())
    }
}

impl fmt::Debug for XdoDesktop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XdoDesktop")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl DesktopBackend for XdoDesktop {
    async fn screen_size(&self) -> Result<ScreenSize, ToolError> {
        let output = self.xdotool(["getdisplaygeometry"]).await?;
        parse_geometry(&output)
    }

    async fn mouse_position(&self) -> Result<Point, ToolError> {
        let output = self.xdotool(["getmouselocation", "--shell"]).await?;
        parse_mouse_location(&output)
    }

    async fn move_mouse(&self, to: Point) -> Result<(), ToolError> {
        self.xdotool(["mousemove".to_string(), to.x.to_string(), to.y.to_string()])
            .await
            .map(|_| ())
    }

    async fn click(&self, at: Point, button: MouseButton, clicks: u32) -> Result<(), ToolError> {
        self.move_mouse(at).await?;
        self.xdotool([
            "click".to_string(),
            "--repeat".to_string(),
            clicks.to_string(),
            "--delay".to_string(),
            "100".to_string(),
            button.x11_code().to_string(),
        ])
        .await
        .map(|_| ())
    }

    async fn drag(
        &self,
        to: Point,
        button: MouseButton,
        duration: Duration,
    ) -> Result<(), ToolError> {
        let code = button.x11_code().to_string();
        self.xdotool(["mousedown", code.as_str()]).await?;
        tokio::time::sleep(duration).await;
        let moved = self.move_mouse(to).await;
        // Release even when the move failed so the button is not left held.
        self.xdotool(["mouseup", code.as_str()]).await?;
        moved
    }

    async fn scroll(&self, direction: ScrollDirection, steps: u32) -> Result<(), ToolError> {
        if steps == 0 {
            return Ok(());
        }
        self.xdotool([
            "click".to_string(),
            "--repeat".to_string(),
            steps.to_string(),
            "--delay".to_string(),
            "100".to_string(),
            direction.x11_button().to_string(),
        ])
        .await
        .map(|_| ())
    }

    async fn type_text(&self, text: &str, interval: Duration) -> Result<(), ToolError> {
        self.xdotool([
            "type".to_string(),
            "--delay".to_string(),
            interval.as_millis().to_string(),
            "--".to_string(),
            text.to_string(),
        ])
        .await
        .map(|_| ())
    }

    async fn press_keys(&self, keys: &[&str]) -> Result<(), ToolError> {
        let chord = keys.iter().map(|key| keysym(key)).collect::<Vec<_>>().join("+");
        self.xdotool(["key", "--clearmodifiers", chord.as_str()])
            .await
            .map(|_| ())
    }

    async fn key_down(&self, key: &str) -> Result<(), ToolError> {
        let key = keysym(key);
        self.xdotool(["keydown", key.as_str()]).await.map(|_| ())
    }

    async fn key_up(&self, key: &str) -> Result<(), ToolError> {
        let key = keysym(key);
        self.xdotool(["keyup", key.as_str()]).await.map(|_| ())
    }

    async fn capture(&self, dest: &Path, region: Option<Region>) -> Result<(), ToolError> {
        let mut args = vec!["-window".to_string(), "root".to_string()];
        if let Some(region) = region {
            args.push("-crop".to_string());
            args.push(format!(
                "{}x{}+{}+{}",
                region.width, region.height, region.x, region.y
            ));
            args.push("+repage".to_string());
        }
        args.push(dest.display().to_string());
        self.helper("import", args).await.map(|_| ())
    }

    async fn locate(
        &self,
        template: &Path,
        confidence: f64,
    ) -> Result<Option<Region>, ToolError> {
        let size = self
            .helper(
                "identify",
                ["-format".to_string(), "%w %h".to_string(), template.display().to_string()],
            )
            .await?;
        let (width, height) = parse_dimensions(&size)?;

        let screen = tempfile::Builder::new()
            .prefix("friday-screen-")
            .suffix(".png")
            .tempfile()
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        self.capture(screen.path(), None).await?;

        let spec = CommandSpec::new("compare")
            .args([
                "-metric".to_string(),
                "NCC".to_string(),
                "-subimage-search".to_string(),
                screen.path().display().to_string(),
                template.display().to_string(),
                "null:".to_string(),
            ])
            .timeout(self.timeout);
        let result = self.runner.run(spec).await.map_err(exec_error)?;
        // compare exits 0 for similar, 1 for dissimilar, 2 on error.
        if !matches!(result.status_code, Some(0) | Some(1)) {
            return Err(ToolError::ExecutionFailed(result.stderr.trim().to_string()));
        }
        let (score, at) = parse_compare_output(&result.stderr)?;
        debug!("template match (score={score:.3}, confidence={confidence})");
        if score < confidence {
            return Ok(None);
        }
        Ok(Some(Region {
            x: at.x,
            y: at.y,
            width,
            height,
        }))
    }

    async fn windows(&self) -> Result<Vec<WindowInfo>, ToolError> {
        let output = self.helper("wmctrl", ["-l"]).await?;
        parse_window_list(&output)
    }

    async fn focus_window(&self, window: &WindowInfo) -> Result<(), ToolError> {
        self.wmctrl(["-i", "-a", window.id.as_str()]).await
    }

    async fn move_window(&self, window: &WindowInfo, to: Point) -> Result<(), ToolError> {
        let geometry = format!("0,{},{},-1,-1", to.x, to.y);
        self.wmctrl(["-i", "-r", window.id.as_str(), "-e", geometry.as_str()])
            .await
    }

    async fn resize_window(
        &self,
        window: &WindowInfo,
        width: u32,
        height: u32,
    ) -> Result<(), ToolError> {
        let geometry = format!("0,-1,-1,{width},{height}");
        self.wmctrl(["-i", "-r", window.id.as_str(), "-e", geometry.as_str()])
            .await
    }

    async fn close_window(&self, window: &WindowInfo) -> Result<(), ToolError> {
        self.wmctrl(["-i", "-c", window.id.as_str()]).await
    }
}

/// Map a user-facing key name to an X11 keysym understood by xdotool.
pub fn keysym(name: &str) -> String {
    let trimmed = name.trim();
    let lower = trimmed.to_ascii_lowercase();
    let mapped = match lower.as_str() {
        "ctrl" | "control" => "ctrl",
        "alt" | "option" => "alt",
        "shift" => "shift",
        "win" | "super" | "cmd" | "command" | "meta" => "super",
        "enter" | "return" => "Return",
        "esc" | "escape" => "Escape",
        "tab" => "Tab",
        "space" => "space",
        "backspace" => "BackSpace",
        "delete" | "del" => "Delete",
        "insert" => "Insert",
        "home" => "Home",
        "end" => "End",
        "up" => "Up",
        "down" => "Down",
        "left" => "Left",
        "right" => "Right",
        "pageup" | "pgup" => "Prior",
        "pagedown" | "pgdn" => "Next",
        "printscreen" | "prtsc" => "Print",
        "capslock" => "Caps_Lock",
        "volumemute" => "XF86AudioMute",
        "volumeup" => "XF86AudioRaiseVolume",
        "volumedown" => "XF86AudioLowerVolume",
        _ => {
            if let Some(number) = lower.strip_prefix('f')
                && let Ok(index) = number.parse::<u8>()
                && (1..=24).contains(&index)
            {
                return format!("F{index}");
            }
            return trimmed.to_string();
        }
    };
    mapped.to_string()
}

fn parse_geometry(output: &str) -> Result<ScreenSize, ToolError> {
    let (width, height) = parse_dimensions(output)?;
    Ok(ScreenSize { width, height })
}

fn parse_dimensions(output: &str) -> Result<(u32, u32), ToolError> {
    let mut parts = output.split_whitespace().map(str::parse::<u32>);
    match (parts.next(), parts.next()) {
        (Some(Ok(width)), Some(Ok(height))) => Ok((width, height)),
        _ => Err(ToolError::ExecutionFailed(format!(
            "unexpected dimensions output: {}",
            output.trim()
        ))),
    }
}

fn parse_mouse_location(output: &str) -> Result<Point, ToolError> {
    let mut x = None;
    let mut y = None;
    for line in output.lines() {
        if let Some(value) = line.strip_prefix("X=") {
            x = value.trim().parse::<i64>().ok();
        } else if let Some(value) = line.strip_prefix("Y=") {
            y = value.trim().parse::<i64>().ok();
        }
    }
    match (x, y) {
        (Some(x), Some(y)) => Ok(Point { x, y }),
        _ => Err(ToolError::ExecutionFailed(
            "unexpected mouse location output".to_string(),
        )),
    }
}

fn parse_compare_output(output: &str) -> Result<(f64, Point), ToolError> {
    let Some(regex) = COMPARE_PATTERN.as_ref() else {
        return Err(ToolError::ExecutionFailed(
            "invalid compare pattern".to_string(),
        ));
    };
    let Some(captures) = regex.captures(output) else {
        return Err(ToolError::ExecutionFailed(format!(
            "unexpected compare output: {}",
            output.trim()
        )));
    };
    // ImageMagick 7 prints "distortion (normalized) @ x,y"; 6 prints "score @ x,y".
    let score = captures
        .get(2)
        .or_else(|| captures.get(1))
        .and_then(|value| value.as_str().parse::<f64>().ok());
    let x = captures[3].parse::<i64>().ok();
    let y = captures[4].parse::<i64>().ok();
    match (score, x, y) {
        (Some(score), Some(x), Some(y)) => Ok((score, Point { x, y })),
        _ => Err(ToolError::ExecutionFailed(format!(
            "unexpected compare output: {}",
            output.trim()
        ))),
    }
}

fn parse_window_list(output: &str) -> Result<Vec<WindowInfo>, ToolError> {
    let Some(regex) = WINDOW_ROW_PATTERN.as_ref() else {
        return Err(ToolError::ExecutionFailed(
            "invalid window list pattern".to_string(),
        ));
    };
    let windows = output
        .lines()
        .filter_map(|line| regex.captures(line))
        .filter_map(|captures| {
            let title = captures[4].trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(WindowInfo {
                id: captures[1].to_string(),
                title,
            })
        })
        .collect();
    Ok(windows)
}
