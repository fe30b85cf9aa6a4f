use async_trait::async_trait;
use friday_rs_protocol::ToolError;
use friday_rs_tools::{
    DesktopBackend, MouseButton, Point, Region, ScreenSize, ScrollDirection, WindowInfo,
};
use parking_lot::Mutex;
use std::path::Path;
use std::time::Duration;

/// Desktop double with a 1920x1080 screen that records every action as text.
#[derive(Debug)]
pub struct RecordingDesktop {
    size: ScreenSize,
    pointer: Mutex<Point>,
    windows: Mutex<Vec<WindowInfo>>,
    located: Option<Region>,
    actions: Mutex<Vec<String>>,
}

impl Default for RecordingDesktop {
    fn default() -> Self {
        Self {
            size: ScreenSize {
                width: 1920,
                height: 1080,
            },
            pointer: Mutex::new(Point { x: 0, y: 0 }),
            windows: Mutex::new(Vec::new()),
            located: None,
            actions: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_windows<I, S>(self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.windows.lock() = titles
            .into_iter()
            .enumerate()
            .map(|(index, title)| WindowInfo {
                id: format!("0x{:08x}", index + 1),
                title: title.into(),
            })
            .collect();
        self
    }

    pub fn with_located(mut self, region: Region) -> Self {
        self.located = Some(region);
        self
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().clone()
    }

    fn record(&self, action: String) {
        self.actions.lock().push(action);
    }
}

#[async_trait]
impl DesktopBackend for RecordingDesktop {
    async fn screen_size(&self) -> Result<ScreenSize, ToolError> {
        Ok(self.size)
    }

    async fn mouse_position(&self) -> Result<Point, ToolError> {
        Ok(*self.pointer.lock())
    }

    async fn move_mouse(&self, to: Point) -> Result<(), ToolError> {
        *self.pointer.lock() = to;
        self.record(format!("move {},{}", to.x, to.y));
        Ok(())
    }

    async fn click(&self, at: Point, button: MouseButton, clicks: u32) -> Result<(), ToolError> {
        *self.pointer.lock() = at;
        self.record(format!("click {},{} {button} x{clicks}", at.x, at.y));
        Ok(())
    }

    async fn drag(
        &self,
        to: Point,
        button: MouseButton,
        duration: Duration,
    ) -> Result<(), ToolError> {
        *self.pointer.lock() = to;
        self.record(format!(
            "drag {},{} {button} {}ms",
            to.x,
            to.y,
            duration.as_millis()
        ));
        Ok(())
    }

    async fn scroll(&self, direction: ScrollDirection, steps: u32) -> Result<(), ToolError> {
        self.record(format!("scroll {direction} {steps}"));
        Ok(())
    }

    async fn type_text(&self, text: &str, interval: Duration) -> Result<(), ToolError> {
        self.record(format!("type {text:?} {}ms", interval.as_millis()));
        Ok(())
    }

    async fn press_keys(&self, keys: &[&str]) -> Result<(), ToolError> {
        self.record(format!("keys {}", keys.join("+")));
        Ok(())
    }

    async fn key_down(&self, key: &str) -> Result<(), ToolError> {
        self.record(format!("keydown {key}"));
        Ok(())
    }

    async fn key_up(&self, key: &str) -> Result<(), ToolError> {
        self.record(format!("keyup {key}"));
        Ok(())
    }

    async fn capture(&self, dest: &Path, region: Option<Region>) -> Result<(), ToolError> {
        std::fs::write(dest, b"\x89PNG")
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        match region {
            Some(region) => self.record(format!("capture {region}")),
            None => self.record("capture full".to_string()),
        }
        Ok(())
    }

    async fn locate(
        &self,
        _template: &Path,
        _confidence: f64,
    ) -> Result<Option<Region>, ToolError> {
        Ok(self.located)
    }

    async fn windows(&self) -> Result<Vec<WindowInfo>, ToolError> {
        Ok(self.windows.lock().clone())
    }

    async fn focus_window(&self, window: &WindowInfo) -> Result<(), ToolError> {
        self.record(format!("focus {}", window.title));
        Ok(())
    }

    async fn move_window(&self, window: &WindowInfo, to: Point) -> Result<(), ToolError> {
        self.record(format!("move-window {} {},{}", window.title, to.x, to.y));
        Ok(())
    }

    async fn resize_window(
        &self,
        window: &WindowInfo,
        width: u32,
        height: u32,
    ) -> Result<(), ToolError> {
        self.record(format!("resize-window {} {width}x{height}", window.title));
        Ok(())
    }

    async fn close_window(&self, window: &WindowInfo) -> Result<(), ToolError> {
        self.record(format!("close-window {}", window.title));
        self.windows.lock().retain(|other| other.id != window.id);
        Ok(())
    }
}
